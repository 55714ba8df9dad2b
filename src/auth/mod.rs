//! Authentication strategies.
//!
//! Two ways to authenticate a request against the API:
//!
//! - [`SimpleAuth`]: adds `api_key` (and `api_token` when present) to the
//!   parameters and signs them with the shared secret. See [`signer`].
//! - [`DelegatedAuth`]: hands the request to a [`TokenSigner`] together with a
//!   previously obtained access token/secret pair. The default signer is
//!   [`OAuth1Signer`].
//!
//! The strategy is picked once when the client is built. Whatever it is, the
//! client gets back a [`SignedRequest`]: a ready-to-send query string plus
//! the headers to attach.

pub mod delegated;
pub mod oauth;
pub mod signer;
pub mod simple;

use std::fmt;
use std::str::FromStr;

use crate::error::{OdeskError, SigningError};
use crate::http::HttpMethod;
use crate::query::{encode, Params};

pub use delegated::DelegatedAuth;
pub use oauth::{OAuth1Signer, TokenRequest, TokenSigned, TokenSigner};
pub use signer::{sign, signed_urlencode, SIGNATURE_FIELD};
pub use simple::SimpleAuth;

/// Which authentication strategy a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Simple,
    Delegated,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Delegated => "delegated",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = OdeskError;

    /// Accepts `simple`, and `delegated` or `oauth` for the token scheme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "delegated" | "oauth" => Ok(Self::Delegated),
            other => Err(OdeskError::Config(format!(
                "Unknown auth mode '{}' (expected simple or oauth)",
                other
            ))),
        }
    }
}

/// Application keys issued by the API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub public_key: String,
    pub secret_key: String,
    pub api_token: Option<String>,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            api_token: None,
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Access token pair for delegated auth. Opaque to this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Output of a token signer: either already encoded, or still a mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Encoded(String),
    Params(Params),
}

impl Payload {
    pub fn into_query_string(self) -> Result<String, SigningError> {
        match self {
            Self::Encoded(query) => Ok(query),
            Self::Params(params) => encode(&params),
        }
    }
}

/// A request after authentication: query string and headers, ready to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedRequest {
    pub query: String,
    pub headers: Vec<(String, String)>,
}

/// Turns request parameters into an authenticated payload.
///
/// `method` is the method that goes on the wire, after any verb override.
pub trait AuthStrategy: Send + Sync + fmt::Debug {
    fn mode(&self) -> AuthMode;

    fn build(
        &self,
        url: &str,
        method: HttpMethod,
        params: Params,
    ) -> Result<SignedRequest, SigningError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!("simple".parse::<AuthMode>().unwrap(), AuthMode::Simple);
        assert_eq!("OAuth".parse::<AuthMode>().unwrap(), AuthMode::Delegated);
        assert_eq!(" delegated ".parse::<AuthMode>().unwrap(), AuthMode::Delegated);
        assert!("basic".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("pub", "hunter2").with_api_token("tok");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("pub"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok\""));

        let token = AccessToken::new("at", "shh");
        assert!(!format!("{:?}", token).contains("shh"));
    }

    #[test]
    fn test_payload_into_query_string() {
        let encoded = Payload::Encoded("a=1".to_string());
        assert_eq!(encoded.into_query_string().unwrap(), "a=1");

        let params = Payload::Params(Params::new().with("b", 2).with("a", "x y"));
        assert_eq!(params.into_query_string().unwrap(), "a=x+y&b=2");
    }
}
