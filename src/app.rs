//! Process-level glue for the `core-api` binary.
//!
//! Maps failures to exit codes and hints, and routes logs to stderr so
//! stdout stays pure JSON.

use std::process::ExitCode;

use core_api_client::config::{ConfigError, field};
use core_api_client::error::ClientError;
use core_api_client::transport::TransportError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// Exit codes of the `core-api` binary.
pub mod exit_code {
    use std::process::ExitCode;

    /// The payload was printed.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Invalid arguments, config file or client configuration.
    pub const CONFIG: u8 = 1;

    /// [`CONFIG`] as an [`ExitCode`].
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// No usable response: transport failure, undecodable payload, render failure.
    pub const RUNTIME: u8 = 2;

    /// The node answered but the `--strict` translator rejected the status.
    pub const REJECTED: u8 = 3;

    /// The call was abandoned on Ctrl+C or SIGTERM (128 + SIGINT).
    pub const CANCELLED: u8 = 130;

    /// `ExitCode::from` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(RUNTIME)
    }
}

/// Failure classes a caller of the binary can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exit 1
    Configuration,
    /// Exit 2
    Runtime,
    /// Exit 3
    Rejected,
    /// Exit 130
    Cancelled,
}

impl Outcome {
    /// Classifies a failed run.
    #[must_use]
    pub const fn of(error: &RunError) -> Self {
        match error {
            RunError::Client(ClientError::Configuration(_) | ClientError::Validation { .. }) => {
                Self::Configuration
            }
            RunError::Client(ClientError::Api(_)) => Self::Rejected,
            RunError::Client(ClientError::Cancelled { .. }) => Self::Cancelled,
            _ => Self::Runtime,
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Configuration => exit_code::CONFIG,
            Self::Runtime => exit_code::RUNTIME,
            Self::Rejected => exit_code::REJECTED,
            Self::Cancelled => exit_code::CANCELLED,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        Self::from(outcome.code())
    }
}

/// Prints a hint for configuration errors the user can fix directly.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Prints a hint for a failed call, if one applies.
pub fn print_failure_hint(error: &RunError) {
    if let Some(hint) = failure_hint(error) {
        eprintln!("\n{hint}");
    }
}

fn config_hint(error: &ConfigError) -> Option<String> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::NETWORK => {
            Some("Run 'core-api init' to generate a configuration template.".to_string())
        }
        ConfigError::FileRead { .. } => {
            Some("Run 'core-api init' to generate a configuration template.".to_string())
        }
        ConfigError::InvalidProxy { .. } => {
            Some("Proxy URLs need a scheme, e.g. http://proxy:8080.".to_string())
        }
        _ => None,
    }
}

fn failure_hint(error: &RunError) -> Option<String> {
    let RunError::Client(error) = error else {
        return None;
    };

    match error {
        ClientError::Transport(TransportError::Timeout) => {
            Some("The node did not answer in time; raise --timeout.".to_string())
        }
        ClientError::Transport(TransportError::Connection(_)) => {
            Some("Check that --base-path points at a running node.".to_string())
        }
        ClientError::Api(e) => Some(format!(
            "The node answered {}; run without --strict to print the body.",
            e.status
        )),
        ClientError::Deserialization { status, .. } if !status.is_success() => Some(format!(
            "The node answered {status} with an error body; use --strict to report it as a rejection."
        )),
        _ => None,
    }
}

/// Sets up the tracing subscriber on stderr.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
