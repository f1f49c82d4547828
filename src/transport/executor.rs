//! Request execution in blocking and cancellable modes.

use std::collections::BTreeMap;
use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use tokio::runtime::{Handle, Runtime};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ResolvedConfiguration;
use crate::error::ClientError;
use crate::operation::Operation;
use crate::request::RequestOptions;

use super::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// How a call waits for its response.
#[derive(Debug, Clone, Copy)]
pub enum ExecutionMode<'a> {
    /// Run to completion on the calling thread.
    Blocking,
    /// Suspend until the response arrives or the token is cancelled.
    Cancellable(&'a CancellationToken),
}

/// Owns the transport and the runtime used by blocking calls.
///
/// The blocking runtime keeps one worker thread. Connection tasks a
/// blocking call leaves in the transport's pool are spawned onto it, so
/// they stay driven after `block_on` returns and a later asynchronous call
/// can reuse the connection.
///
/// Both are released together by [`Executor::release`], which is
/// idempotent and also runs on drop. Calls made after release fail with
/// [`TransportError::Closed`].
#[derive(Debug)]
pub struct Executor<H> {
    client: Option<H>,
    runtime: Option<Runtime>,
}

impl<H: HttpClient> Executor<H> {
    /// Creates an executor around a transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Runtime`] if the blocking runtime cannot
    /// be started.
    pub fn new(client: H) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("core-api-blocking")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        Ok(Self {
            client: Some(client),
            runtime: Some(runtime),
        })
    }

    /// Returns the transport, unless released.
    #[must_use]
    pub const fn client(&self) -> Option<&H> {
        self.client.as_ref()
    }

    /// Returns true once [`Executor::release`] has run.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.client.is_none()
    }

    /// Drives `future` to completion on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::BlockingInAsyncContext`] when called from
    /// inside an async runtime, and [`TransportError::Closed`] after release.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, TransportError> {
        if Handle::try_current().is_ok() {
            return Err(TransportError::BlockingInAsyncContext);
        }
        let runtime = self.runtime.as_ref().ok_or(TransportError::Closed)?;
        Ok(runtime.block_on(future))
    }

    /// Sends one call and returns the raw response.
    ///
    /// The target URL is `config.base_path` joined with the operation's
    /// path template. Configured default headers and authentication are
    /// applied first; headers set on `options` take precedence. The status
    /// code is not inspected.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] if a path parameter is missing
    /// - [`ClientError::Cancelled`] if the token fires before the response
    /// - [`ClientError::Transport`] if no response could be obtained
    pub async fn execute(
        &self,
        operation: &Operation,
        options: RequestOptions<Vec<u8>>,
        config: &ResolvedConfiguration,
        mode: ExecutionMode<'_>,
    ) -> Result<HttpResponse, ClientError> {
        let client = self.client.as_ref().ok_or(TransportError::Closed)?;

        let url = resolve_url(
            &config.base_path,
            operation.path,
            &options.path_params,
            &options.query_params,
            operation.name,
        )?;

        let request = HttpRequest {
            method: operation.method.clone(),
            url,
            headers: merge_headers(config, options.headers),
            body: options.body,
        };

        tracing::debug!(
            operation = operation.name,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let result = match mode {
            ExecutionMode::Blocking => client.request(request).await,
            ExecutionMode::Cancellable(token) => {
                if token.is_cancelled() {
                    tracing::info!(operation = operation.name, "Call cancelled before dispatch");
                    return Err(cancelled(operation));
                }
                tokio::select! {
                    biased;
                    result = client.request(request) => result,
                    () = token.cancelled() => {
                        tracing::info!(operation = operation.name, "Call cancelled in flight");
                        return Err(cancelled(operation));
                    }
                }
            }
        };

        match result {
            Ok(response) => {
                tracing::debug!(
                    operation = operation.name,
                    status = response.status.as_u16(),
                    "Received response"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(operation = operation.name, error = %e, "Transport failure");
                Err(e.into())
            }
        }
    }
}

impl<H> Executor<H> {
    /// Releases the transport and the blocking runtime.
    ///
    /// Safe to call any number of times, from sync or async context.
    pub fn release(&mut self) {
        let had_client = self.client.take().is_some();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
        if had_client {
            tracing::debug!("Transport released");
        }
    }
}

impl<H> Drop for Executor<H> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Builds the absolute target URL for a call.
///
/// `{name}` segments in `template` are replaced by the matching entry of
/// `path_params` (percent-encoded as a single path segment) and
/// `query_params` are appended in order. A trailing slash on `base` is
/// ignored, so `http://node/core/` and `http://node/core` resolve alike.
///
/// # Errors
///
/// - [`ClientError::Validation`] if the template names a parameter that is
///   not supplied
/// - [`ClientError::Transport`] with [`TransportError::InvalidUrl`] if
///   `base` cannot carry a path
pub fn resolve_url(
    base: &Url,
    template: &str,
    path_params: &BTreeMap<String, String>,
    query_params: &[(String, String)],
    operation: &str,
) -> Result<Url, ClientError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl(format!("'{base}' cannot be a base URL")))?;
        segments.pop_if_empty();

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => {
                    let value = path_params
                        .get(name)
                        .ok_or_else(|| ClientError::missing_parameter(name, operation))?;
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }

    if !query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query_params {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Layers per-call headers over the configured defaults.
fn merge_headers(config: &ResolvedConfiguration, call_headers: HeaderMap) -> HeaderMap {
    let mut headers = config.default_headers.clone();

    if !headers.contains_key(USER_AGENT) {
        if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, value);
        }
    }

    if !headers.contains_key(AUTHORIZATION) && !call_headers.contains_key(AUTHORIZATION) {
        if let Some(value) = authorization(config) {
            headers.insert(AUTHORIZATION, value);
        }
    }

    // A call header replaces every default value under its name, then
    // keeps all of its own values
    let mut current = None;
    for (name, value) in call_headers {
        match name {
            Some(name) => {
                headers.insert(&name, value);
                current = Some(name);
            }
            None => {
                if let Some(name) = &current {
                    headers.append(name, value);
                }
            }
        }
    }

    headers
}

fn authorization(config: &ResolvedConfiguration) -> Option<HeaderValue> {
    let raw = if let Some(token) = &config.access_token {
        format!("Bearer {token}")
    } else {
        let auth = config.basic_auth.as_ref()?;
        let credentials = format!(
            "{}:{}",
            auth.username,
            auth.password.as_deref().unwrap_or_default()
        );
        format!("Basic {}", BASE64.encode(credentials))
    };

    let mut value = HeaderValue::from_str(&raw).ok()?;
    value.set_sensitive(true);
    Some(value)
}

fn cancelled(operation: &Operation) -> ClientError {
    ClientError::Cancelled {
        operation: operation.name.to_string(),
    }
}
