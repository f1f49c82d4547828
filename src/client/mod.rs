//! Generic request dispatch shared by every endpoint facade.
//!
//! [`ApiClient`] composes the resolved configuration, the request option
//! builder, the [`Executor`] and the [`ExceptionSlot`]. Facades such as
//! [`MempoolApi`](crate::api::MempoolApi) only declare an [`Operation`] and
//! pick an [`ExecutionMode`].
//!
//! # Call flow
//!
//! 1. The mandatory body is checked, then content negotiation runs
//! 2. The body is serialized and the request is dispatched
//! 3. The exception translator inspects the raw response
//! 4. The payload is decoded into the expected type

mod response;


pub use response::ApiResponse;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::codec;
use crate::config::{ConfigError, Configuration, ResolvedConfiguration};
use crate::error::ClientError;
use crate::exception::{ExceptionFactory, ExceptionSlot};
use crate::operation::Operation;
use crate::request::RequestOptions;
use crate::transport::{ExecutionMode, Executor, HttpClient, ReqwestClient};

/// Core client bound to one resolved configuration and one transport.
///
/// The transport is released when the client is dropped, or earlier with
/// [`ApiClient::close`]. Calls take `&self`, so one client can serve any
/// number of concurrent calls; each call owns its own options and response.
///
/// # Type Parameters
///
/// - `H`: The transport implementation (defaults to [`ReqwestClient`])
#[derive(Debug)]
pub struct ApiClient<H = ReqwestClient> {
    config: ResolvedConfiguration,
    executor: Executor<H>,
    exceptions: ExceptionSlot,
}

impl ApiClient<ReqwestClient> {
    /// Creates a client from the process-wide default alone.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the configuration cannot be
    /// resolved or the HTTP client cannot be built.
    pub fn new(default: &Configuration) -> Result<Self, ClientError> {
        Self::with_configuration(Some(default), None)
    }

    /// Creates a client whose override only sets the base path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`]; also fails if `base_path` is not a URL.
    pub fn with_base_path(default: &Configuration, base_path: &str) -> Result<Self, ClientError> {
        let overrides = Configuration::for_base_path(base_path)?;
        Self::with_configuration(Some(default), Some(&overrides))
    }

    /// Creates a client from a default and an override.
    ///
    /// The reqwest transport is tuned from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfiguration`] (wrapped) when both are
    /// absent, or any error raised while building the transport.
    pub fn with_configuration(
        default: Option<&Configuration>,
        overrides: Option<&Configuration>,
    ) -> Result<Self, ClientError> {
        let config = Configuration::merge(default, overrides)?;
        let transport = ReqwestClient::from_configuration(&config)?;
        Self::from_resolved(transport, config)
    }
}

impl<H: HttpClient> ApiClient<H> {
    /// Creates a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the configuration cannot be
    /// resolved, or [`ClientError::Transport`] if the blocking runtime
    /// cannot be started.
    pub fn with_transport(
        transport: H,
        default: Option<&Configuration>,
        overrides: Option<&Configuration>,
    ) -> Result<Self, ClientError> {
        let config = Configuration::merge(default, overrides)?;
        Self::from_resolved(transport, config)
    }

    /// Creates a client from an already resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the blocking runtime cannot be
    /// started.
    pub fn from_resolved(transport: H, config: ResolvedConfiguration) -> Result<Self, ClientError> {
        tracing::debug!("Creating API client: {config}");
        Ok(Self {
            config,
            executor: Executor::new(transport)?,
            exceptions: ExceptionSlot::new(),
        })
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub const fn configuration(&self) -> &ResolvedConfiguration {
        &self.config
    }

    /// Returns the base path every call is resolved against.
    #[must_use]
    pub const fn base_path(&self) -> &Url {
        &self.config.base_path
    }

    /// Returns the transport, unless the client is closed.
    #[must_use]
    pub const fn transport(&self) -> Option<&H> {
        self.executor.client()
    }

    /// Returns the exception slot.
    #[must_use]
    pub const fn exceptions(&self) -> &ExceptionSlot {
        &self.exceptions
    }

    /// Installs an exception factory, replacing any existing one.
    pub fn set_exception_factory(&self, factory: impl ExceptionFactory + 'static) {
        if self.exceptions.set(factory) {
            tracing::debug!("Replaced exception factory");
        }
    }

    /// Installs an exception factory if none is installed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MulticastExceptionFactory`] if one already is.
    pub fn add_exception_factory(
        &self,
        factory: impl ExceptionFactory + 'static,
    ) -> Result<(), ConfigError> {
        self.exceptions.add(factory)
    }

    /// Removes the exception factory, making every status a success.
    pub fn clear_exception_factory(&self) {
        self.exceptions.clear();
    }

    /// Releases the transport. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        self.executor.release();
    }

    /// Returns true once the client has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.executor.is_released()
    }

    /// Performs one call in the given mode.
    ///
    /// This is the single implementation behind every facade method; the
    /// blocking and asynchronous forms differ only in `mode`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] if the operation requires a body and
    ///   `options` carry none, before any I/O
    /// - [`ClientError::Serialization`] if the body cannot be encoded
    /// - [`ClientError::Transport`] or [`ClientError::Cancelled`] from the
    ///   executor, unchanged
    /// - [`ClientError::Api`] if the exception factory rejects the response
    /// - [`ClientError::Deserialization`] if the payload does not decode
    pub async fn invoke<B, T>(
        &self,
        operation: &Operation,
        options: RequestOptions<B>,
        mode: ExecutionMode<'_>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        require_body(operation, &options)?;

        let options = options
            .negotiate(operation.content_types, operation.accepts)?
            .try_map_body(|body| codec::serialize(&body))
            .map_err(|source| ClientError::Serialization {
                operation: operation.name.to_string(),
                source,
            })?;

        let raw = self
            .executor
            .execute(operation, options, &self.config, mode)
            .await?;

        if let Some(error) = self.exceptions.translate(operation.name, &raw) {
            tracing::debug!(
                operation = operation.name,
                status = raw.status.as_u16(),
                "Exception factory rejected response"
            );
            return Err(error.into());
        }

        let data = codec::deserialize(&raw.body).map_err(|source| ClientError::Deserialization {
            operation: operation.name.to_string(),
            status: raw.status,
            source,
        })?;

        Ok(ApiResponse::new(raw, data))
    }

    /// Performs one call, blocking the current thread until it completes.
    ///
    /// Must not be called from inside an async runtime.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`]. Also returns [`ClientError::Transport`] if
    /// called from async context or after [`ApiClient::close`].
    pub fn invoke_blocking<B, T>(
        &self,
        operation: &Operation,
        options: RequestOptions<B>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        // Validation outranks the runtime checks in block_on
        require_body(operation, &options)?;
        self.executor
            .block_on(self.invoke(operation, options, ExecutionMode::Blocking))?
    }

    /// Performs one call, abandoning it if `cancel` fires first.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`].
    pub async fn invoke_async<B, T>(
        &self,
        operation: &Operation,
        options: RequestOptions<B>,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.invoke(operation, options, ExecutionMode::Cancellable(cancel))
            .await
    }
}

fn require_body<B>(operation: &Operation, options: &RequestOptions<B>) -> Result<(), ClientError> {
    match operation.required_body {
        Some(parameter) if options.body.is_none() => {
            Err(ClientError::missing_parameter(parameter, operation.name))
        }
        _ => Ok(()),
    }
}
