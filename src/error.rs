//! Error types for the oDesk client core.
//!
//! Each layer has its own error enum; [`OdeskError`] aggregates them so the
//! verb methods on [`OdeskClient`](crate::client::OdeskClient) can surface
//! any failure with `?`.

use std::fmt;

use thiserror::Error;

use crate::namespace::Namespace;

/// Failure while coercing or signing request parameters.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Raw bytes handed in as a value are not legal UTF-8
    #[error("Value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Float without a text representation (NaN or infinite)
    #[error("Value {0} has no text representation")]
    NonFinite(f64),

    /// Coercion failed for a specific field
    #[error("Cannot sign field '{key}': {source}")]
    Field {
        key: String,
        #[source]
        source: Box<SigningError>,
    },

    /// Form encoding of the coerced pairs failed
    #[error("Query encoding failed: {0}")]
    Encoding(#[from] serde_urlencoded::ser::Error),

    /// The signing key was rejected by the MAC
    #[error("Invalid signing key: {0}")]
    Key(String),

    /// The query already on the request URL is not valid form encoding
    #[error("Cannot parse URL query: {0}")]
    UrlQuery(#[from] serde_urlencoded::de::Error),
}

impl SigningError {
    pub(crate) fn field(key: &str, source: SigningError) -> Self {
        Self::Field {
            key: key.to_string(),
            source: Box::new(source),
        }
    }
}

/// Failure reported by a [`Transport`](crate::http::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Network/connection error from reqwest
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Failure turning a response body into a structured value.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Only JSON is supported
    #[error("Unsupported response format '{0}' (only json is supported)")]
    UnsupportedFormat(String),

    /// 2xx response with nothing in it
    #[error("Empty response body")]
    EmptyBody,

    /// Body is not well-formed JSON, or does not match the requested type
    #[error("Malformed json response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Form-encoded string could not be parsed
    #[error("Malformed query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
}

/// Body carried by an [`ApiError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The error body parsed as JSON
    Json(serde_json::Value),
    /// The raw text, when it did not parse
    Text(String),
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Non-2xx response from the API.
#[derive(Debug, Clone, Error)]
#[error("API error {status}: {body}")]
pub struct ApiError {
    pub status: u16,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Best-effort human readable message.
    ///
    /// Looks at `message`, `error` and `error.message` in a JSON body and
    /// falls back to the raw text.
    pub fn message(&self) -> Option<String> {
        match &self.body {
            ErrorBody::Json(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| value.get("error").and_then(|e| e.as_str()))
                .or_else(|| value.pointer("/error/message").and_then(|m| m.as_str()))
                .map(str::to_string),
            ErrorBody::Text(text) if text.trim().is_empty() => None,
            ErrorBody::Text(text) => Some(text.clone()),
        }
    }
}

/// Top-level error for the client.
#[derive(Debug, Error)]
pub enum OdeskError {
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid builder or environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The namespace was switched off when the client was built
    #[error("Namespace '{0}' is not enabled on this client")]
    NamespaceDisabled(Namespace),
}

impl OdeskError {
    /// HTTP status when the error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type OdeskResult<T> = Result<T, OdeskError>;
