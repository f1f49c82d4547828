//! Configuration layer.
//!
//! This module provides:
//! - Client configuration and resolution ([`Configuration`], [`ResolvedConfiguration`])
//! - Default values ([`defaults`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated command-line configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//!
//! # Resolution
//!
//! A client is built from two [`Configuration`] values: the process-wide
//! default, created once at startup and passed explicitly, and an optional
//! per-client override. [`Configuration::merge`] resolves them field by
//! field, override first.
//!
//! # Command-line priority
//!
//! The `core-api` binary builds its override from, highest to lowest:
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Process-wide default** ([`Configuration::global_default`])
//!
//! Headers merge per name across CLI and TOML, CLI winning on conflicts.

mod cli;
mod configuration;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, MempoolCommand};
pub use configuration::{BasicAuth, Configuration, ResolvedConfiguration};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{Action, ValidatedConfig, write_default_config};
