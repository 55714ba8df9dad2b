//! Shared-secret authentication.

use crate::auth::signer::signed_urlencode;
use crate::auth::{AuthMode, AuthStrategy, Credentials, SignedRequest};
use crate::error::SigningError;
use crate::http::HttpMethod;
use crate::query::Params;

/// Field carrying the public key.
pub const API_KEY_FIELD: &str = "api_key";

/// Field carrying the optional API token.
pub const API_TOKEN_FIELD: &str = "api_token";

/// Signs every request with the application's secret key.
///
/// Never adds headers; everything travels in the signed query.
#[derive(Debug, Clone)]
pub struct SimpleAuth {
    credentials: Credentials,
}

impl SimpleAuth {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Add `api_key`/`api_token` to `params` and return the signed query.
    pub fn urlencode(&self, mut params: Params) -> Result<String, SigningError> {
        params.insert(API_KEY_FIELD, self.credentials.public_key.as_str());
        if let Some(token) = &self.credentials.api_token {
            params.insert(API_TOKEN_FIELD, token.as_str());
        }
        signed_urlencode(&self.credentials.secret_key, &params)
    }
}

impl AuthStrategy for SimpleAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::Simple
    }

    fn build(
        &self,
        _url: &str,
        _method: HttpMethod,
        params: Params,
    ) -> Result<SignedRequest, SigningError> {
        Ok(SignedRequest {
            query: self.urlencode(params)?,
            headers: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::{sign, SIGNATURE_FIELD};
    use crate::query::{decode, QueryValue};

    fn auth(token: Option<&str>) -> SimpleAuth {
        let mut credentials = Credentials::new("public", "some$ecret");
        if let Some(token) = token {
            credentials = credentials.with_api_token(token);
        }
        SimpleAuth::new(credentials)
    }

    #[test]
    fn test_injects_api_key_and_signs() {
        let query = auth(None).urlencode(Params::new().with("foo", "bar")).unwrap();
        let mut decoded = decode(&query).unwrap();

        assert_eq!(decoded.get(API_KEY_FIELD), Some(&QueryValue::from("public")));
        assert!(!decoded.contains_key(API_TOKEN_FIELD));

        let signature = decoded.remove(SIGNATURE_FIELD).unwrap();
        assert_eq!(
            signature,
            QueryValue::Text(sign("some$ecret", &decoded).unwrap())
        );
        assert!(query.starts_with("api_sig="));
    }

    #[test]
    fn test_injects_api_token_when_present() {
        let query = auth(Some("tok123")).urlencode(Params::new()).unwrap();
        let decoded = decode(&query).unwrap();
        assert_eq!(decoded.get(API_TOKEN_FIELD), Some(&QueryValue::from("tok123")));
    }

    #[test]
    fn test_build_never_adds_headers() {
        let signed = auth(Some("tok"))
            .build("https://www.odesk.com/api/hr/v2/teams.json", HttpMethod::Post, Params::new())
            .unwrap();
        assert!(signed.headers.is_empty());
        assert!(!signed.query.is_empty());
        assert_eq!(auth(None).mode(), AuthMode::Simple);
    }
}
