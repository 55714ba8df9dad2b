//! HTTP verbs and the verb-override rule.
//!
//! Intermediaries in front of the API only pass GET and POST. `PUT` and
//! `DELETE` are therefore sent as `POST` with the intended verb in an
//! `http_method` field.

use std::fmt;

use crate::query::Params;

/// Field carrying the overridden verb.
pub const HTTP_METHOD_FIELD: &str = "http_method";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Value for the `http_method` field, for verbs that need overriding.
    pub fn override_value(&self) -> Option<&'static str> {
        match self {
            Self::Put => Some("put"),
            Self::Delete => Some("delete"),
            Self::Get | Self::Post => None,
        }
    }

    /// The method that actually goes on the wire.
    pub fn wire_method(&self) -> HttpMethod {
        match self {
            Self::Put | Self::Delete => Self::Post,
            other => *other,
        }
    }

    /// Insert the override field when needed and return the wire method.
    pub fn apply_override(&self, params: &mut Params) -> HttpMethod {
        if let Some(verb) = self.override_value() {
            params.insert(HTTP_METHOD_FIELD, verb);
        }
        self.wire_method()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryValue;

    #[test]
    fn test_put_and_delete_are_overridden() {
        for (method, verb) in [(HttpMethod::Put, "put"), (HttpMethod::Delete, "delete")] {
            let mut params = Params::new().with("status", "active");
            let wire = method.apply_override(&mut params);

            assert_eq!(wire, HttpMethod::Post);
            assert_eq!(params.get(HTTP_METHOD_FIELD), Some(&QueryValue::from(verb)));
            assert_eq!(params.len(), 2);
        }
    }

    #[test]
    fn test_get_and_post_are_untouched() {
        for method in [HttpMethod::Get, HttpMethod::Post] {
            let mut params = Params::new();
            assert_eq!(method.apply_override(&mut params), method);
            assert!(params.is_empty());
        }
    }

    #[test]
    fn test_reqwest_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
