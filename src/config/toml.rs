//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Client configuration section
    #[serde(default)]
    pub client: ClientSection,

    /// Node configuration section
    #[serde(default)]
    pub node: NodeSection,
}

/// Client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base path of the Core API
    pub base_path: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// User-Agent header value
    pub user_agent: Option<String>,

    /// Proxy URL
    pub proxy: Option<String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,

    /// User name for basic authentication
    pub username: Option<String>,

    /// Password for basic authentication
    pub password: Option<String>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Node configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    /// Logical network identifier
    pub network: Option<String>,

    /// Treat any status of 400 or above as an error
    #[serde(default)]
    pub strict: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Core API client configuration file

[client]
# Base path of the Core API (default: http://localhost)
# base_path = "http://localhost:3333/core"

# Request timeout in seconds (default: 100)
# timeout = 100

# User-Agent header value
# user_agent = "core-api-client"

# Proxy URL for every request
# proxy = "http://proxy.internal:8080"

# Bearer token for Authorization header
# bearer = "your-token-here"

# Basic authentication (ignored when bearer is set)
# username = "admin"
# password = "secret"

# HTTP headers sent with every request
# [client.headers]
# X-Custom-Header = "value"

[node]
# Logical network identifier (required for mempool commands)
# network = "mainnet"

# Treat any status of 400 or above as an error
# strict = false
"#
    .to_string()
}
