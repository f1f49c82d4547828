//! Response envelope returned by "with response" calls.

use http::{HeaderMap, StatusCode};

use crate::transport::HttpResponse;

/// Status, headers, raw body and decoded payload of one completed call.
///
/// Owned by the caller and read-only.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    status: StatusCode,
    headers: HeaderMap,
    raw_content: Vec<u8>,
    data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a raw response and its decoded payload.
    #[must_use]
    pub fn new(raw: HttpResponse, data: T) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            raw_content: raw.body,
            data,
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Undecoded response body.
    #[must_use]
    pub fn raw_content(&self) -> &[u8] {
        &self.raw_content
    }

    /// Decoded payload.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the envelope, keeping only the payload.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}
