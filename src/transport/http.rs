//! HTTP request/response types and the transport collaborator trait.

use std::sync::Arc;

use super::TransportError;

/// A fully resolved HTTP request ready for dispatch.
///
/// Built by the executor from the resolved configuration and the per-call
/// [`RequestOptions`](crate::request::RequestOptions). It uses standard
/// `http` crate types for method and headers, so any [`HttpClient`]
/// implementation can consume it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (POST for every Core API endpoint)
    pub method: http::Method,
    /// Absolute target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Serialized request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map and body is `None`.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A raw HTTP response received from the node.
///
/// This is the undecoded half of the response envelope: status, headers
/// and the fully buffered body. Exception translators inspect this form.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (fully buffered)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Trait for the transport collaborator.
///
/// # Design
///
/// The client never talks to a concrete HTTP library. Implementations:
/// - [`ReqwestClient`](super::ReqwestClient) for production use
/// - recording stubs in tests, to assert whether a call reached the wire
///
/// Implementations must not retry and must not inspect the status code;
/// both are policy decisions made above the transport.
///
/// # Example
///
/// ```ignore
/// use core_api_client::transport::{HttpClient, HttpRequest, HttpResponse, TransportError};
///
/// struct CannedClient {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for CannedClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, TransportError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when:
    /// - Network connection fails ([`TransportError::Connection`])
    /// - Request times out ([`TransportError::Timeout`])
    /// - URL is rejected by the client ([`TransportError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).request(req)
    }
}
