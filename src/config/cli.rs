//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// Core API client
///
/// Queries a node's Core API for the contents of its mempool.
#[derive(Debug, Parser)]
#[command(name = "core-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Base path of the Core API, e.g. <http://localhost:3333/core>
    #[arg(long = "base-path", global = true)]
    pub base_path: Option<String>,

    /// Logical network identifier, e.g. mainnet
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V", global = true)]
    pub headers: Vec<String>,

    /// Bearer token for Authorization header
    #[arg(long, global = true)]
    pub bearer: Option<String>,

    /// User name for basic authentication
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// User-Agent header value
    #[arg(long = "user-agent", global = true)]
    pub user_agent: Option<String>,

    /// Proxy URL for every request
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Treat any status of 400 or above as an error
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print status and headers along with the payload
    #[arg(long = "include-response", global = true)]
    pub include_response: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for core-api
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Inspect the node's mempool
    #[command(subcommand)]
    Mempool(MempoolCommand),
}

/// Mempool subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MempoolCommand {
    /// List the hashes of every transaction in the mempool
    List,

    /// Fetch the payloads of one mempool transaction
    Transaction {
        /// Hex-encoded notarized payload hash
        #[arg(long = "payload-hash")]
        payload_hash: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
