//! Error types for configuration resolution and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is raised before any request reaches the network.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a process-wide default nor a per-client override was supplied.
    #[error("No configuration available: supply a default or an override configuration")]
    NoConfiguration,

    /// A second exception factory was added while one was already installed.
    #[error("Multicast exception factory is unsupported: an exception factory is already installed")]
    MulticastExceptionFactory,

    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid base path URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid proxy URL.
    #[error("Invalid proxy '{url}': {reason}")]
    InvalidProxy {
        /// The rejected proxy URL
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid header format.
    #[error("Invalid header format '{value}': expected 'Key=Value' or 'Key: Value'")]
    InvalidHeader {
        /// The invalid header string
        value: String,
    },

    /// Invalid header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Well-known field names for `MissingRequired` errors.
pub mod field {
    /// The subcommand selecting the remote operation.
    pub const COMMAND: &str = "command";
    /// The network identifier used by every mempool request.
    pub const NETWORK: &str = "network";
    /// The payload hash of a mempool transaction lookup.
    pub const PAYLOAD_HASH: &str = "payload_hash";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
