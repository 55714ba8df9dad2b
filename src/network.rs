//! Network constants for the oDesk API.

/// Default host for all API calls.
pub const DEFAULT_BASE_URL: &str = "https://www.odesk.com";

/// Path root of the regular REST resources.
pub const API_ROOT: &str = "api";

/// Path root of the report (GDS) resources.
pub const GDS_ROOT: &str = "gds";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "odesk-rust";
