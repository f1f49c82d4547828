//! Shared test fixtures for transport-level tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, StatusCode};

use super::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// What the stub does with each request it receives.
enum Behavior {
    /// Return a clone of this response
    Respond(HttpResponse),
    /// Return 200 with the request body as the response body
    Echo,
    /// Fail with a timeout
    Fail,
    /// Never complete
    Hang,
}

/// Recording transport stub.
///
/// Every request is recorded before the configured behavior runs, so tests
/// can assert whether a call reached the wire.
pub struct StubClient {
    behavior: Behavior,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl StubClient {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Responds with `status` and a JSON `body`.
    pub fn json(status: StatusCode, body: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::with_behavior(Behavior::Respond(HttpResponse::new(
            status,
            headers,
            body.as_bytes().to_vec(),
        )))
    }

    /// Responds with `200 OK` and `{}`.
    pub fn ok() -> Self {
        Self::json(StatusCode::OK, "{}")
    }

    /// Echoes the request body back with `200 OK`.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Fails every request with [`TransportError::Timeout`].
    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Fail)
    }

    /// Never completes a request.
    pub fn hanging() -> Self {
        Self::with_behavior(Behavior::Hang)
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request received.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl HttpClient for StubClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = req.body.clone().unwrap_or_default();
        self.requests.lock().unwrap().push(req);

        match &self.behavior {
            Behavior::Respond(response) => Ok(response.clone()),
            Behavior::Echo => Ok(HttpResponse::new(StatusCode::OK, HeaderMap::new(), body)),
            Behavior::Fail => Err(TransportError::Timeout),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
