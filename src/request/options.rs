//! Per-call request options and required-parameter validation.

use std::collections::BTreeMap;

use http::HeaderMap;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderName, HeaderValue};

use crate::error::ClientError;

use super::{select_accept, select_content_type};

/// Method-agnostic metadata for a single call.
///
/// Created fresh for every call and consumed by the executor; never shared
/// between calls. Header names are unique: setting a header twice keeps the
/// last value. The body is held as the caller's value and is serialized only
/// when the request is dispatched.
///
/// # Example
///
/// ```
/// use core_api_client::request::RequestOptions;
/// use http::header::{CONTENT_TYPE, HeaderValue};
///
/// let options = RequestOptions::new()
///     .with_body("payload")
///     .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
///     .negotiate(&["application/json"], &["application/json"])
///     .unwrap();
///
/// // An explicit Content-Type is never overwritten.
/// assert_eq!(options.headers[CONTENT_TYPE], "text/plain");
/// assert_eq!(options.headers["accept"], "application/json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions<B> {
    /// Header parameters
    pub headers: HeaderMap,
    /// Values substituted into `{name}` segments of the path template
    pub path_params: BTreeMap<String, String>,
    /// Query string parameters, in insertion order
    pub query_params: Vec<(String, String)>,
    /// Outgoing body, not yet serialized
    pub body: Option<B>,
}

impl<B> Default for RequestOptions<B> {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            path_params: BTreeMap::new(),
            query_params: Vec::new(),
            body: None,
        }
    }
}

impl<B> RequestOptions<B> {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the body verbatim.
    #[must_use]
    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a path template parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Converts the body, keeping headers and parameters.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` fails with.
    pub fn try_map_body<C, E>(
        self,
        f: impl FnOnce(B) -> Result<C, E>,
    ) -> Result<RequestOptions<C>, E> {
        Ok(RequestOptions {
            headers: self.headers,
            path_params: self.path_params,
            query_params: self.query_params,
            body: self.body.map(f).transpose()?,
        })
    }

    /// Applies content negotiation.
    ///
    /// Sets `Content-Type` from `content_types` and `Accept` from `accepts`
    /// (see [`select_content_type`] and [`select_accept`]), leaving either
    /// header alone when it is already present.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] if a selected media type is not
    /// a valid header value.
    pub fn negotiate(mut self, content_types: &[&str], accepts: &[&str]) -> Result<Self, ClientError> {
        if !self.headers.contains_key(CONTENT_TYPE) {
            if let Some(content_type) = select_content_type(content_types) {
                self.headers
                    .insert(CONTENT_TYPE, header_value(&CONTENT_TYPE, content_type)?);
            }
        }

        if !self.headers.contains_key(ACCEPT) {
            if let Some(accept) = select_accept(accepts) {
                self.headers.insert(ACCEPT, header_value(&ACCEPT, &accept)?);
            }
        }

        Ok(self)
    }
}

/// Builds the options for one call.
///
/// `body` is attached as-is, `path_params` are stored for substitution at
/// dispatch, and content negotiation fills `Content-Type` and `Accept`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidHeader`] if a selected media type is not a
/// valid header value.
pub fn build_options<B, I, K, V>(
    body: Option<B>,
    content_types: &[&str],
    accepts: &[&str],
    path_params: I,
) -> Result<RequestOptions<B>, ClientError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut options = RequestOptions {
        body,
        ..RequestOptions::default()
    };
    for (name, value) in path_params {
        options = options.with_path_param(name, value);
    }

    options.negotiate(content_types, accepts)
}

/// Unwraps a mandatory input, failing with a validation error when absent.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] naming `parameter` and `operation`.
pub fn require<T>(value: Option<T>, parameter: &str, operation: &str) -> Result<T, ClientError> {
    value.ok_or_else(|| ClientError::missing_parameter(parameter, operation))
}

/// Checks that a mandatory string field is non-empty.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] naming `parameter` and `operation`.
pub fn require_non_empty(value: &str, parameter: &str, operation: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::missing_parameter(parameter, operation));
    }
    Ok(())
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
