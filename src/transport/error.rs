//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport-level failures.
///
/// Raised when no response could be obtained from the remote node.
/// Responses with non-2xx statuses are *not* transport errors; they are
/// returned as envelopes and left to the exception translator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The target URL could not be built from the base path and path template.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client has already released its transport resources.
    #[error("Client is closed")]
    Closed,

    /// A blocking call was made from inside an async runtime.
    ///
    /// Use the asynchronous form of the call instead.
    #[error("Blocking call made from within an async runtime")]
    BlockingInAsyncContext,

    /// The blocking runtime could not be started.
    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
