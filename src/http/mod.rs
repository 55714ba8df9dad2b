//! HTTP layer: verbs, blocking transport, response decoding.

pub mod decode;
pub mod method;
pub mod transport;

pub use decode::{decode_as, decode_body, decode_response, ResponseFormat};
pub use method::{HttpMethod, HTTP_METHOD_FIELD};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, DEFAULT_TIMEOUT_SECS};
