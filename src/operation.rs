//! Declarative endpoint descriptions.

use http::Method;

use crate::config::defaults::JSON_CONTENT_TYPE;

/// Media types declared by every JSON endpoint.
pub const JSON_ONLY: &[&str] = &[JSON_CONTENT_TYPE];

/// Static description of one remote operation.
///
/// Endpoint facades declare one constant per operation and hand it to
/// [`ApiClient::invoke`](crate::client::ApiClient::invoke).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, used in error messages and passed to translators
    pub name: &'static str,
    /// HTTP verb
    pub method: Method,
    /// Path template relative to the base path, `{name}` marks parameters
    pub path: &'static str,
    /// Media types the operation can send, by priority
    pub content_types: &'static [&'static str],
    /// Media types the operation can receive, by priority
    pub accepts: &'static [&'static str],
    /// Name of the body parameter when a body is mandatory
    pub required_body: Option<&'static str>,
}

impl Operation {
    /// Declares a JSON POST operation with a mandatory body.
    #[must_use]
    pub const fn json_post(name: &'static str, path: &'static str, body: &'static str) -> Self {
        Self {
            name,
            method: Method::POST,
            path,
            content_types: JSON_ONLY,
            accepts: JSON_ONLY,
            required_body: Some(body),
        }
    }
}
