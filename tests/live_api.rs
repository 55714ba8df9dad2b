//! Live tests against the oDesk API.
//!
//! Requires credentials in the environment or a `.env` file:
//! `ODESK_PUBLIC_KEY`, `ODESK_SECRET_KEY` and, for delegated auth,
//! `ODESK_AUTH=oauth`, `ODESK_ACCESS_TOKEN`, `ODESK_ACCESS_TOKEN_SECRET`.
//!
//! Run: cargo test --test live_api -- --nocapture --ignored

use odesk::prelude::*;

fn live_client() -> Option<OdeskClient> {
    dotenvy::dotenv().ok();
    match OdeskClient::from_env() {
        Ok(client) => Some(client),
        Err(e) => {
            println!("Skipping live test: {}", e);
            None
        }
    }
}

#[test]
#[ignore]
fn test_live_list_teams() {
    let Some(client) = live_client() else {
        return;
    };

    let teams = client.hr().unwrap().get("teams", None).unwrap();
    println!("Teams: {}", teams);
    assert!(teams.is_object());
}

#[test]
#[ignore]
fn test_live_bad_signature_is_rejected() {
    let Some(client) = live_client() else {
        return;
    };

    let bad = OdeskClient::builder(client.credentials().public_key.clone(), "wrong-secret")
        .base_url(client.base_url())
        .build()
        .unwrap();

    let err = bad.hr().unwrap().get("teams", None).unwrap_err();
    println!("Rejected with: {}", err);
    assert!(err.status().is_some());
}
