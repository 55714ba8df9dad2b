//! Response decoding.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, DecodeError, ErrorBody, OdeskError, TransportError};
use crate::http::RawResponse;

/// Structured format requested from the API. Only JSON exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
}

impl ResponseFormat {
    /// Suffix appended to every resource path.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ResponseFormat {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(DecodeError::UnsupportedFormat(s.to_string()))
        }
    }
}

/// Parse a body in the given format.
///
/// An empty body is an error, never an empty result.
pub fn decode_body(body: &str, format: ResponseFormat) -> Result<Value, DecodeError> {
    if body.trim().is_empty() {
        return Err(DecodeError::EmptyBody);
    }
    match format {
        ResponseFormat::Json => Ok(serde_json::from_str(body)?),
    }
}

/// Turn a decoded value into a caller type.
pub fn decode_as<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    Ok(serde_json::from_value(value)?)
}

/// Build an [`ApiError`], decoding the body when it is well-formed.
pub fn api_error(status: u16, body: String, format: ResponseFormat) -> ApiError {
    let body = match decode_body(&body, format) {
        Ok(value) => ErrorBody::Json(value),
        Err(_) => ErrorBody::Text(body),
    };
    ApiError { status, body }
}

/// Decode the outcome of a transport call.
///
/// Non-2xx responses become [`OdeskError::Api`] whether the transport
/// reported them as errors or handed them back as responses.
pub fn decode_response(
    result: Result<RawResponse, TransportError>,
    format: ResponseFormat,
) -> Result<Value, OdeskError> {
    match result {
        Ok(raw) if raw.is_success() => Ok(decode_body(&raw.body, format)?),
        Ok(raw) => Err(api_error(raw.status, raw.body, format).into()),
        Err(TransportError::Status { status, body }) => Err(api_error(status, body, format).into()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn ok(body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("JSON".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert!(matches!(
            "xml".parse::<ResponseFormat>(),
            Err(DecodeError::UnsupportedFormat(f)) if f == "xml"
        ));
        assert_eq!(ResponseFormat::default().extension(), "json");
    }

    #[test]
    fn test_decode_success() {
        let body = r#"{"teams": [{"id": "t1"}]}"#;
        let value = decode_response(ok(body), ResponseFormat::Json).unwrap();
        assert_eq!(value, json!({"teams": [{"id": "t1"}]}));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_response(ok("{not json"), ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, OdeskError::Decode(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_empty_body_is_decode_error() {
        let err = decode_response(ok("  "), ResponseFormat::Json).unwrap_err();
        assert!(matches!(err, OdeskError::Decode(DecodeError::EmptyBody)));
    }

    #[test]
    fn test_status_error_with_json_body() {
        let result = Err(TransportError::Status {
            status: 403,
            body: r#"{"error": {"message": "Access denied"}}"#.to_string(),
        });
        match decode_response(result, ResponseFormat::Json).unwrap_err() {
            OdeskError::Api(e) => {
                assert_eq!(e.status(), 403);
                assert!(matches!(e.body(), ErrorBody::Json(_)));
                assert_eq!(e.message().as_deref(), Some("Access denied"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_error_with_text_body() {
        let result = Ok(RawResponse {
            status: 500,
            body: "<html>oops</html>".to_string(),
        });
        match decode_response(result, ResponseFormat::Json).unwrap_err() {
            OdeskError::Api(e) => {
                assert_eq!(e.status(), 500);
                assert_eq!(e.body(), &ErrorBody::Text("<html>oops</html>".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_as() {
        #[derive(Deserialize)]
        struct Team {
            id: String,
        }
        let team: Team = decode_as(json!({"id": "t1", "name": "Ops"})).unwrap();
        assert_eq!(team.id, "t1");
        assert!(decode_as::<Team>(json!({"name": "Ops"})).is_err());
    }
}
