//! Shared-secret request signing.
//!
//! The signature is the lowercase hex MD5 of
//! `secret + key1 + value1 + key2 + value2 + ...` with keys in byte order.
//! MD5 is what the API verifies against; it is not used for security here.

use md5::{Digest, Md5};

use crate::error::SigningError;
use crate::query::{encode_pairs, to_utf8_bytes, Params};

/// Name of the field carrying the signature.
pub const SIGNATURE_FIELD: &str = "api_sig";

/// Compute the signature for `query` under `secret`.
///
/// An `api_sig` entry in `query` is ignored so a signature never feeds
/// its own digest.
pub fn sign(secret: &str, query: &Params) -> Result<String, SigningError> {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());

    for (key, value) in query.iter().filter(|(key, _)| *key != SIGNATURE_FIELD) {
        let bytes = to_utf8_bytes(value).map_err(|e| {
            tracing::debug!(key = %key, error = %e, "Failed to coerce value while signing");
            SigningError::field(key, e)
        })?;
        hasher.update(key.as_bytes());
        hasher.update(&bytes);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Sign `query` and encode it, signature first, then every key in order.
///
/// ```text
/// signed_urlencode("some$ecret", {spam: 42, foo: "bar"})
///   == "api_sig=11b1fc2e6555297bdc144aed0a5e641c&foo=bar&spam=42"
/// ```
pub fn signed_urlencode(secret: &str, query: &Params) -> Result<String, SigningError> {
    let mut query = query.clone();
    if query.remove(SIGNATURE_FIELD).is_some() {
        tracing::warn!("Discarding caller-supplied api_sig before signing");
    }

    let signature = sign(secret, &query)?;

    let mut pairs = Vec::with_capacity(query.len() + 1);
    pairs.push((SIGNATURE_FIELD.to_string(), signature));
    pairs.extend(query.to_pairs()?);
    encode_pairs(&pairs)
}
