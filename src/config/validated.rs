//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the binary. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};

use super::cli::{Cli, Command, MempoolCommand};
use super::configuration::{BasicAuth, Configuration, parse_url};
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// The remote operation a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `mempool list`
    MempoolList {
        /// Logical network identifier
        network: String,
    },
    /// `mempool transaction`
    MempoolTransaction {
        /// Logical network identifier
        network: String,
        /// Hex-encoded notarized payload hash
        payload_hash: String,
    },
}

/// Fully validated command-line configuration.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config. The function validates all inputs and returns errors for
/// invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Per-client override, merged over the process-wide default
    pub overrides: Configuration,

    /// Operation to perform
    pub action: Action,

    /// Install the status-code exception translator
    pub strict: bool,

    /// Print status and headers along with the payload
    pub include_response: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base_path = self
            .overrides
            .base_path
            .as_ref()
            .map_or_else(|| "default".to_string(), ToString::to_string);
        let timeout = self
            .overrides
            .timeout
            .map_or_else(|| "default".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ base_path: {}, timeout: {}, headers: {}, strict: {}, action: {:?} }}",
            base_path,
            timeout,
            self.overrides.default_headers.len(),
            self.strict,
            self.action,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The command is not a remote operation
    /// - The network is missing
    /// - The base path or proxy is not a URL
    /// - The timeout is zero
    /// - Header format is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let action = Self::resolve_action(cli, toml)?;

        let mut overrides = Configuration::new();
        overrides.base_path = Self::resolve_base_path(cli, toml)?;
        overrides.default_headers = Self::resolve_headers(cli, toml)?;
        overrides.timeout = Self::resolve_timeout(cli, toml)?;
        overrides.user_agent = cli
            .user_agent
            .clone()
            .or_else(|| toml.and_then(|t| t.client.user_agent.clone()));
        overrides.proxy = Self::resolve_proxy(cli, toml)?;
        overrides.access_token = cli
            .bearer
            .clone()
            .or_else(|| toml.and_then(|t| t.client.bearer.clone()));
        overrides.basic_auth = Self::resolve_basic_auth(cli, toml);

        // Flags only enable
        let strict = cli.strict || toml.is_some_and(|t| t.node.strict);

        Ok(Self {
            overrides,
            action,
            strict,
            include_response: cli.include_response,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path. A
    /// leading `~` expands to the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_action(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Action, ConfigError> {
        let Command::Mempool(command) = &cli.command else {
            return Err(ConfigError::missing(
                field::COMMAND,
                "Use 'core-api mempool list' or 'core-api mempool transaction'",
            ));
        };

        let network = cli
            .network
            .clone()
            .or_else(|| toml.and_then(|t| t.node.network.clone()))
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::NETWORK,
                    "Use --network or set node.network in config file",
                )
            })?;

        Ok(match command {
            MempoolCommand::List => Action::MempoolList { network },
            MempoolCommand::Transaction { payload_hash } => Action::MempoolTransaction {
                network,
                payload_hash: payload_hash.clone(),
            },
        })
    }

    fn resolve_base_path(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<url::Url>, ConfigError> {
        cli.base_path
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.base_path.as_deref()))
            .map(parse_url)
            .transpose()
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.client.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn resolve_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Duration>, ConfigError> {
        let Some(seconds) = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.client.timeout))
        else {
            return Ok(None);
        };

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Some(Duration::from_secs(seconds)))
    }

    fn resolve_proxy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<url::Url>, ConfigError> {
        let Some(proxy) = cli
            .proxy
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.proxy.as_deref()))
        else {
            return Ok(None);
        };

        url::Url::parse(proxy)
            .map(Some)
            .map_err(|e| ConfigError::InvalidProxy {
                url: proxy.to_string(),
                reason: e.to_string(),
            })
    }

    fn resolve_basic_auth(cli: &Cli, toml: Option<&TomlConfig>) -> Option<BasicAuth> {
        // Username and password resolve independently; CLI wins for each
        let username = cli
            .username
            .clone()
            .or_else(|| toml.and_then(|t| t.client.username.clone()))?;
        let password = cli
            .password
            .clone()
            .or_else(|| toml.and_then(|t| t.client.password.clone()));

        Some(BasicAuth::new(username, password))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
