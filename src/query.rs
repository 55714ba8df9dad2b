//! Request parameters and the form-urlencoded query codec.
//!
//! Every key and value that ends up on the wire, or in a signature, goes
//! through [`to_utf8_bytes`] first. Text and numbers always coerce; raw bytes
//! are accepted only when they already are legal UTF-8.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{DecodeError, SigningError};

/// A scalar request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Bytes that are expected to be UTF-8 already
    Bytes(Vec<u8>),
}

/// Coerce a value into the UTF-8 bytes used for signing and encoding.
///
/// Numbers and booleans use their canonical text form (`42`, `0.5`, `true`).
/// Raw bytes are validated and rejected when they are not UTF-8.
pub fn to_utf8_bytes(value: &QueryValue) -> Result<Vec<u8>, SigningError> {
    match value {
        QueryValue::Text(text) => Ok(text.as_bytes().to_vec()),
        QueryValue::Int(n) => Ok(n.to_string().into_bytes()),
        QueryValue::UInt(n) => Ok(n.to_string().into_bytes()),
        QueryValue::Float(f) if !f.is_finite() => Err(SigningError::NonFinite(*f)),
        QueryValue::Float(f) => Ok(f.to_string().into_bytes()),
        QueryValue::Bool(b) => Ok(b.to_string().into_bytes()),
        QueryValue::Bytes(bytes) => {
            tracing::debug!(len = bytes.len(), "Coercing raw bytes, validating as UTF-8");
            std::str::from_utf8(bytes)?;
            Ok(bytes.clone())
        }
    }
}

impl QueryValue {
    /// The coerced value as a `String`.
    pub fn to_text(&self) -> Result<String, SigningError> {
        let bytes = to_utf8_bytes(self)?;
        String::from_utf8(bytes).map_err(|e| SigningError::InvalidUtf8(e.utf8_error()))
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for QueryValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for QueryValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Request parameters, kept sorted by key.
///
/// Keys order by their UTF-8 bytes, which is the order the signer needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, QueryValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    /// Coerce every value to text, in sorted key order.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, SigningError> {
        self.0
            .iter()
            .map(|(key, value)| {
                value
                    .to_text()
                    .map(|text| (key.clone(), text))
                    .map_err(|e| SigningError::field(key, e))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Params {
    type Item = (String, QueryValue);
    type IntoIter = btree_map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Encode parameters as an `application/x-www-form-urlencoded` string.
pub fn encode(params: &Params) -> Result<String, SigningError> {
    encode_pairs(&params.to_pairs()?)
}

/// Encode already-coerced pairs, preserving their order.
pub fn encode_pairs(pairs: &[(String, String)]) -> Result<String, SigningError> {
    Ok(serde_urlencoded::to_string(pairs)?)
}

/// Parse a form-encoded string back into text parameters.
pub fn decode(query: &str) -> Result<Params, DecodeError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(to_utf8_bytes(&QueryValue::from(42)).unwrap(), b"42");
        assert_eq!(to_utf8_bytes(&QueryValue::from(-7i64)).unwrap(), b"-7");
        assert_eq!(to_utf8_bytes(&QueryValue::from(0.5)).unwrap(), b"0.5");
        assert_eq!(to_utf8_bytes(&QueryValue::from(true)).unwrap(), b"true");
        assert_eq!(
            to_utf8_bytes(&QueryValue::from("naïve")).unwrap(),
            "naïve".as_bytes()
        );
    }

    #[test]
    fn test_bytes_coercion_accepts_utf8() {
        let value = QueryValue::from("café".as_bytes());
        assert_eq!(value.to_text().unwrap(), "café");
    }

    #[test]
    fn test_bytes_coercion_rejects_invalid_utf8() {
        let value = QueryValue::from(vec![0x66u8, 0x6f, 0xff, 0xfe]);
        let err = to_utf8_bytes(&value).unwrap_err();
        assert!(matches!(err, SigningError::InvalidUtf8(_)));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = to_utf8_bytes(&QueryValue::Float(f64::NAN)).unwrap_err();
        assert!(matches!(err, SigningError::NonFinite(_)));
    }

    #[test]
    fn test_to_pairs_reports_failing_key() {
        let params = Params::new()
            .with("ok", "fine")
            .with("broken", vec![0xc3u8, 0x28]);
        match params.to_pairs().unwrap_err() {
            SigningError::Field { key, .. } => assert_eq!(key, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_is_sorted_and_escaped() {
        let params = Params::from([("q", "python developer"), ("b", "a&b=c")]);
        assert_eq!(encode(&params).unwrap(), "b=a%26b%3Dc&q=python+developer");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let params = Params::new()
            .with("team", "my:team")
            .with("note", "über ünd ?&=")
            .with("page", 3)
            .with("rate", 12.5);

        let decoded = decode(&encode(&params).unwrap()).unwrap();

        assert_eq!(decoded.len(), params.len());
        for (key, value) in &params {
            assert_eq!(
                decoded.get(key),
                Some(&QueryValue::Text(value.to_text().unwrap()))
            );
        }
    }

    #[test]
    fn test_empty_params_encode_to_empty_string() {
        assert_eq!(encode(&Params::new()).unwrap(), "");
        assert!(decode("").unwrap().is_empty());
    }
}
