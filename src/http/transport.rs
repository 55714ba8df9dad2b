//! Blocking HTTP transport.
//!
//! [`Transport`] is the seam between the client and the network. The
//! default, [`ReqwestTransport`], wraps a `reqwest::blocking::Client`; tests
//! and embedders can plug in their own.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::auth::SignedRequest;
use crate::error::{OdeskError, TransportError};
use crate::http::HttpMethod;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request ready for the wire.
///
/// For `GET` the signed query is already part of `url` and `body` is empty;
/// for everything else the query is the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Lay out a signed request for `method`, which must be the wire method.
    pub fn new(method: HttpMethod, url: impl Into<String>, signed: SignedRequest) -> Self {
        let mut url = url.into();
        let body = match method {
            HttpMethod::Get => {
                if !signed.query.is_empty() {
                    url.push(if url.contains('?') { '&' } else { '?' });
                    url.push_str(&signed.query);
                }
                None
            }
            _ => Some(signed.query),
        };

        Self {
            method,
            url,
            body,
            headers: signed.headers,
        }
    }

    /// URL without its query string, for logging.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// A response as received: status and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests and returns raw responses.
///
/// Implementations report non-2xx responses as [`TransportError::Status`].
pub trait Transport: Send + Sync + fmt::Debug {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the underlying client with a timeout, user agent and default
    /// headers. `Accept: application/json` is always set.
    pub fn from_config(
        timeout: Duration,
        user_agent: &str,
        default_headers: &[(String, String)],
    ) -> Result<Self, OdeskError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                OdeskError::Config(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                OdeskError::Config(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.path(), "Sending request");

        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        if !(200..300).contains(&status) {
            tracing::debug!(status, url = %request.path(), "Request failed");
            return Err(TransportError::Status { status, body });
        }

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(query: &str) -> SignedRequest {
        SignedRequest {
            query: query.to_string(),
            headers: vec![("Authorization".to_string(), "OAuth realm=\"\"".to_string())],
        }
    }

    #[test]
    fn test_get_appends_query_to_url() {
        let request = HttpRequest::new(
            HttpMethod::Get,
            "https://www.odesk.com/api/hr/v2/teams.json",
            signed("api_sig=abc&api_key=k"),
        );
        assert_eq!(
            request.url,
            "https://www.odesk.com/api/hr/v2/teams.json?api_sig=abc&api_key=k"
        );
        assert!(request.body.is_none());
        assert_eq!(request.path(), "https://www.odesk.com/api/hr/v2/teams.json");
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_get_with_existing_query_and_empty_payload() {
        let request = HttpRequest::new(HttpMethod::Get, "https://h/x.json?a=1", signed("b=2"));
        assert_eq!(request.url, "https://h/x.json?a=1&b=2");

        let request = HttpRequest::new(HttpMethod::Get, "https://h/x.json", signed(""));
        assert_eq!(request.url, "https://h/x.json");
    }

    #[test]
    fn test_post_sends_query_as_body() {
        let request = HttpRequest::new(HttpMethod::Post, "https://h/x.json", signed("a=1"));
        assert_eq!(request.url, "https://h/x.json");
        assert_eq!(request.body.as_deref(), Some("a=1"));
    }

    #[test]
    fn test_raw_response_success_range() {
        let ok = RawResponse { status: 204, body: String::new() };
        let redirect = RawResponse { status: 302, body: String::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_invalid_default_header_is_config_error() {
        let err = ReqwestTransport::from_config(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            "odesk-rust",
            &[("bad header".to_string(), "v".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, OdeskError::Config(_)));
    }
}
