//! Request option building for a single call.
//!
//! This module provides:
//! - Per-call request metadata ([`RequestOptions`], [`build_options`])
//! - Content negotiation ([`select_content_type`], [`select_accept`], [`is_json_mime`])
//! - Required-parameter validation ([`require`], [`require_non_empty`])
//!
//! Nothing here performs I/O or suspends.

mod negotiate;
mod options;

#[cfg(test)]
mod negotiate_tests;

pub use negotiate::{is_json_mime, select_accept, select_content_type};
pub use options::{RequestOptions, build_options, require, require_non_empty};
