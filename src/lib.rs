//! # oDesk Rust SDK
//!
//! A blocking Rust client for the oDesk work-marketplace REST API.
//!
//! ## Modules
//!
//! The client is built from a few layers:
//! - [`query`]: parameter mappings and form encoding
//! - [`auth`]: request signing (shared-secret MD5 or delegated OAuth 1.0a)
//! - [`http`]: verbs and the `http_method` override, transport, response decoding
//! - [`client`]: the [`OdeskClient`](client::OdeskClient) tying them together
//!
//! Plus supporting modules:
//! - [`namespace`]: per-resource sub-clients (`hr`, `finance`, `ticket`, ...)
//! - [`config`]: configuration and `ODESK_*` environment loading
//! - [`error`]: error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use odesk::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Shared-secret auth
//!     let client = OdeskClient::builder("public_key", "secret_key")
//!         .api_token("api_token")
//!         .build()?;
//!
//!     // GET https://www.odesk.com/api/hr/v2/teams.json?api_sig=...&api_key=...
//!     let teams = client.hr()?.get("teams", None)?;
//!     println!("{}", teams);
//!
//!     // Sent as POST with http_method=delete
//!     client.delete("api/hr/v2/teams/t1", None)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Quick Start - Delegated Auth
//!
//! ```rust,ignore
//! use odesk::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OdeskClient::builder("consumer_key", "consumer_secret")
//!         .auth(AuthMode::Delegated)
//!         .access_token("token", "token_secret")
//!         .params_in_headers(true)
//!         .build()?;
//!
//!     let tickets = client.ticket()?.get("tickets", None)?;
//!     println!("{}", tickets);
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Authentication strategies and the request signer.
pub mod auth;

/// The API client and its builder.
pub mod client;

/// Client configuration and environment loading.
pub mod config;

/// Error types for every layer.
pub mod error;

/// HTTP verbs, transport and response decoding.
pub mod http;

/// Resource namespaces (sub-clients).
pub mod namespace;

/// Network URL constants.
pub mod network;

/// Parameter mappings and form encoding.
pub mod query;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use odesk::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{LastRequest, OdeskClient, OdeskClientBuilder};
    pub use crate::config::ClientConfig;

    // Auth
    pub use crate::auth::{
        sign, signed_urlencode, AccessToken, AuthMode, AuthStrategy, Credentials, DelegatedAuth,
        OAuth1Signer, SignedRequest, SimpleAuth, TokenSigner,
    };

    // HTTP
    pub use crate::http::{HttpMethod, HttpRequest, RawResponse, ResponseFormat, Transport};

    // Namespaces
    pub use crate::namespace::{Namespace, NamespaceClient, Namespaces};

    // Query
    pub use crate::query::{Params, QueryValue};

    // Errors
    pub use crate::error::{ApiError, DecodeError, ErrorBody, OdeskError, OdeskResult};

    // Network constants
    pub use crate::network::DEFAULT_BASE_URL;
}
