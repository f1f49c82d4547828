//! Transport layer for dispatching calls to the node.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling raw HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Blocking and cancellable execution ([`Executor`], [`ExecutionMode`])
//!
//! No retries happen at this layer; a call either yields a response, of
//! any status, or a [`TransportError`].

mod client;
mod error;
mod executor;
mod http;

#[cfg(test)]
mod executor_tests;
#[cfg(test)]
mod http_tests;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use client::ReqwestClient;
pub use error::TransportError;
pub use executor::{ExecutionMode, Executor, resolve_url};
pub use http::{HttpClient, HttpRequest, HttpResponse};
