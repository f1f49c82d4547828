//! Core API client
//!
//! A client binding for a node's Core API. Calls are JSON over HTTP and
//! every operation is available as a blocking call and as an async call
//! that can be cancelled through a [`CancellationToken`](tokio_util::sync::CancellationToken).

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod exception;
pub mod operation;
pub mod request;
pub mod transport;
