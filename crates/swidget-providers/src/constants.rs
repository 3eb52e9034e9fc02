//! Provider Constants

/// Default request timeout for remote bundles, in seconds
pub const HTTP_DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Content type reported for bundles read from disk or memory
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Error message for request timeouts
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "Request timed out after";
