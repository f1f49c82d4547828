//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default base path of the Core API.
pub const BASE_PATH: &str = "http://localhost";

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 100;

/// Default `User-Agent` header value.
pub const USER_AGENT: &str = concat!("core-api-client/", env!("CARGO_PKG_VERSION"));

/// Content type used by every Core API endpoint, in both directions.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Default configuration file name written by `init`.
pub const CONFIG_FILE: &str = "core-api.toml";

/// Default request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
