//! Caller-facing error taxonomy.
//!
//! Every endpoint call either returns its payload or one of the
//! [`ClientError`] variants below. Blocking and asynchronous calls share the
//! same taxonomy.

use http::{HeaderMap, StatusCode};
use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Error type for client calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A mandatory input was missing or invalid.
    ///
    /// Raised before dispatch; the request never reaches the network.
    /// Classified as `400 Bad Request`, see [`ClientError::status`].
    #[error("Missing required parameter '{parameter}' when calling {operation}")]
    Validation {
        /// Name of the offending parameter
        parameter: String,
        /// Operation being called
        operation: String,
    },

    /// A header produced during option building was not a valid header value.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// No response was obtained from the node.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The caller cancelled an asynchronous call before it completed.
    #[error("Call to {operation} was cancelled")]
    Cancelled {
        /// Operation being called
        operation: String,
    },

    /// The exception translator turned a received response into a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client could not be configured.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The request body could not be serialized.
    #[error("Failed to serialize request for {operation}: {source}")]
    Serialization {
        /// Operation being called
        operation: String,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("Failed to deserialize {status} response from {operation}: {source}")]
    Deserialization {
        /// Operation being called
        operation: String,
        /// Status of the undecodable response
        status: StatusCode,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Creates a `Validation` error for a missing parameter.
    #[must_use]
    pub fn missing_parameter(parameter: &str, operation: &str) -> Self {
        Self::Validation {
            parameter: parameter.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Returns the HTTP status this error is classified under, if any.
    ///
    /// Validation failures are `400`; API errors and undecodable responses
    /// carry the response status.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Validation { .. } | Self::InvalidHeader { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Api(e) => Some(e.status),
            Self::Deserialization { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the error was raised before any I/O took place.
    #[must_use]
    pub const fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidHeader { .. }
                | Self::Configuration(_)
                | Self::Serialization { .. }
        )
    }
}

/// Application-level failure produced by an exception translator.
#[derive(Debug, Clone, Error)]
#[error("API error {status} from {operation}: {message}")]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Operation that produced the response
    pub operation: String,
    /// Human-readable message
    pub message: String,
    /// Raw response body, when it was valid UTF-8
    pub body: Option<String>,
    /// Response headers
    pub headers: HeaderMap,
}

impl ApiError {
    /// Creates an API error with an empty header map and no body.
    #[must_use]
    pub fn new(status: StatusCode, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            operation: operation.into(),
            message: message.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Attaches the raw response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attaches the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
