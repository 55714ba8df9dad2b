//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Delegated auth talks to a [`TokenSigner`]. [`OAuth1Signer`] is the one the
//! API expects: the application keys act as consumer key/secret and the
//! caller's access token pair authorizes the request.
//!
//! The signature base string is
//! `METHOD & enc(normalized_url) & enc(sorted enc(k)=enc(v) pairs)` and the
//! HMAC key is `enc(consumer_secret)&enc(token_secret)`, with RFC 3986
//! percent-encoding throughout.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::auth::{AccessToken, Payload};
use crate::error::SigningError;
use crate::http::HttpMethod;
use crate::query::Params;

type HmacSha1 = Hmac<Sha1>;

pub const OAUTH_VERSION: &str = "1.0";
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

const NONCE_LEN: usize = 32;

/// Everything a token signer needs to authorize one request.
#[derive(Debug, Clone)]
pub struct TokenRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub access_token: &'a AccessToken,
    pub params: Params,
}

/// Result of token signing.
///
/// `headers` carries the authorization material when it does not travel
/// in the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSigned {
    pub payload: Payload,
    pub headers: Vec<(String, String)>,
}

/// Token-exchange signing procedure used by delegated auth.
pub trait TokenSigner: Send + Sync + fmt::Debug {
    fn sign(&self, request: TokenRequest<'_>) -> Result<TokenSigned, SigningError>;
}

/// OAuth 1.0a HMAC-SHA1 signer.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    params_in_headers: bool,
    fixed_nonce: Option<(String, i64)>,
}

impl fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Signer")
            .field("consumer_key", &self.consumer_key)
            .field("params_in_headers", &self.params_in_headers)
            .finish_non_exhaustive()
    }
}

impl OAuth1Signer {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            params_in_headers: false,
            fixed_nonce: None,
        }
    }

    /// Send the oauth parameters in an `Authorization` header instead of
    /// the query.
    pub fn params_in_headers(mut self, enabled: bool) -> Self {
        self.params_in_headers = enabled;
        self
    }

    /// Pin nonce and timestamp. Only useful for reproducible signatures.
    pub fn with_fixed_nonce(mut self, nonce: impl Into<String>, timestamp: i64) -> Self {
        self.fixed_nonce = Some((nonce.into(), timestamp));
        self
    }

    fn nonce_and_timestamp(&self) -> (String, i64) {
        match &self.fixed_nonce {
            Some(fixed) => fixed.clone(),
            None => {
                let nonce = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(NONCE_LEN)
                    .map(char::from)
                    .collect();
                (nonce, chrono::Utc::now().timestamp())
            }
        }
    }

    /// The `oauth_*` parameters for one request, signature included.
    pub fn oauth_params(
        &self,
        method: HttpMethod,
        url: &str,
        access_token: &AccessToken,
        params: &Params,
    ) -> Result<Vec<(String, String)>, SigningError> {
        let (nonce, timestamp) = self.nonce_and_timestamp();

        let mut oauth = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), access_token.token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let mut all = params.to_pairs()?;
        all.extend(url_query_pairs(url)?);
        all.extend(oauth.iter().cloned());

        let base = signature_base_string(method.as_str(), url, &all);
        let signature = hmac_sha1_signature(&base, &self.consumer_secret, &access_token.secret)?;
        oauth.push(("oauth_signature".to_string(), signature));

        Ok(oauth)
    }
}

impl TokenSigner for OAuth1Signer {
    fn sign(&self, request: TokenRequest<'_>) -> Result<TokenSigned, SigningError> {
        let oauth = self.oauth_params(
            request.method,
            request.url,
            request.access_token,
            &request.params,
        )?;

        if self.params_in_headers {
            return Ok(TokenSigned {
                payload: Payload::Params(request.params),
                headers: vec![("Authorization".to_string(), authorization_header(&oauth))],
            });
        }

        let mut params = request.params;
        for (key, value) in oauth {
            params.insert(key, value);
        }
        Ok(TokenSigned {
            payload: Payload::Params(params),
            headers: Vec::new(),
        })
    }
}

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Pairs from the query string already on `url`. They travel on the wire,
/// so they are part of the signature base string.
pub fn url_query_pairs(url: &str) -> Result<Vec<(String, String)>, SigningError> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    match without_fragment.split_once('?') {
        Some((_, query)) if !query.is_empty() => Ok(serde_urlencoded::from_str(query)?),
        _ => Ok(Vec::new()),
    }
}

/// Scheme and host lowercased, default port, query and fragment dropped.
pub fn normalize_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let base = without_fragment.split('?').next().unwrap_or(without_fragment);

    let Some((scheme, rest)) = base.split_once("://") else {
        return base.to_string();
    };
    let scheme = scheme.to_ascii_lowercase();
    let (authority, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, "/"),
    };

    let mut authority = authority.to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => ":80",
        "https" => ":443",
        _ => "",
    };
    if !default_port.is_empty() && authority.ends_with(default_port) {
        authority.truncate(authority.len() - default_port.len());
    }

    format!("{}://{}{}", scheme, authority, path)
}

/// Build the OAuth signature base string.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalize_url(url)),
        percent_encode(&normalized)
    )
}

/// Base64 HMAC-SHA1 of `base` keyed with both secrets.
pub fn hmac_sha1_signature(
    base: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, SigningError> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| SigningError::Key(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// `OAuth realm="", k="v", ...` with values percent-encoded.
pub fn authorization_header(oauth: &[(String, String)]) -> String {
    let fields = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth realm=\"\", {}", fields)
}
