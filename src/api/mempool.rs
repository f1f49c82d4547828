//! Mempool inspection endpoints.

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::{ApiClient, ApiResponse};
use crate::config::{ConfigError, Configuration, field};
use crate::error::ClientError;
use crate::exception::ExceptionFactory;
use crate::operation::Operation;
use crate::request::{RequestOptions, build_options, require_non_empty};
use crate::transport::{HttpClient, ReqwestClient};

use super::models::{
    MempoolListRequest, MempoolListResponse, MempoolTransactionRequest,
    MempoolTransactionResponse,
};

/// `POST /mempool/list`: hashes of every transaction in the mempool.
pub static MEMPOOL_LIST: Operation =
    Operation::json_post("mempool_list", "/mempool/list", "mempool_list_request");

/// `POST /mempool/transaction`: payloads of one mempool transaction.
pub static MEMPOOL_TRANSACTION: Operation = Operation::json_post(
    "mempool_transaction",
    "/mempool/transaction",
    "mempool_transaction_request",
);

/// Typed facade over the mempool endpoints.
///
/// # Example
///
/// ```no_run
/// use core_api_client::api::{MempoolApi, MempoolListRequest};
/// use core_api_client::config::Configuration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let defaults = Configuration::global_default();
/// let api = MempoolApi::with_base_path(&defaults, "http://localhost:3333/core")?;
///
/// let cancel = CancellationToken::new();
/// let list = api
///     .mempool_list(&MempoolListRequest::new("mainnet"), &cancel)
///     .await?;
/// println!("{} transactions in mempool", list.contents.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MempoolApi<H = ReqwestClient> {
    client: ApiClient<H>,
}

impl MempoolApi<ReqwestClient> {
    /// Creates a facade from the process-wide default alone.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn new(default: &Configuration) -> Result<Self, ClientError> {
        ApiClient::new(default).map(Self::from_client)
    }

    /// Creates a facade whose override only sets the base path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::with_base_path`].
    pub fn with_base_path(default: &Configuration, base_path: &str) -> Result<Self, ClientError> {
        ApiClient::with_base_path(default, base_path).map(Self::from_client)
    }

    /// Creates a facade from a default and an override.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::with_configuration`].
    pub fn with_configuration(
        default: Option<&Configuration>,
        overrides: Option<&Configuration>,
    ) -> Result<Self, ClientError> {
        ApiClient::with_configuration(default, overrides).map(Self::from_client)
    }
}

impl<H: HttpClient> MempoolApi<H> {
    /// Wraps an existing client.
    #[must_use]
    pub const fn from_client(client: ApiClient<H>) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient<H> {
        &self.client
    }

    /// Returns the base path calls are resolved against.
    #[must_use]
    pub const fn base_path(&self) -> &Url {
        self.client.base_path()
    }

    /// Installs an exception factory, replacing any existing one.
    pub fn set_exception_factory(&self, factory: impl ExceptionFactory + 'static) {
        self.client.set_exception_factory(factory);
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
        self.client.add_exception_factory(factory)
    }

    /// Releases the transport. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        self.client.close();
    }

    /// Lists the hashes of every transaction in the mempool.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`].
    pub async fn mempool_list(
        &self,
        request: &MempoolListRequest,
        cancel: &CancellationToken,
    ) -> Result<MempoolListResponse, ClientError> {
        self.mempool_list_with_response(request, cancel)
            .await
            .map(ApiResponse::into_data)
    }

    /// Lists mempool transactions, returning the full response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`].
    pub async fn mempool_list_with_response(
        &self,
        request: &MempoolListRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<MempoolListResponse>, ClientError> {
        let options = list_options(request)?;
        self.client
            .invoke_async(&MEMPOOL_LIST, options, cancel)
            .await
    }

    /// Blocking form of [`MempoolApi::mempool_list`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke_blocking`].
    pub fn mempool_list_blocking(
        &self,
        request: &MempoolListRequest,
    ) -> Result<MempoolListResponse, ClientError> {
        self.mempool_list_with_response_blocking(request)
            .map(ApiResponse::into_data)
    }

    /// Blocking form of [`MempoolApi::mempool_list_with_response`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke_blocking`].
    pub fn mempool_list_with_response_blocking(
        &self,
        request: &MempoolListRequest,
    ) -> Result<ApiResponse<MempoolListResponse>, ClientError> {
        let options = list_options(request)?;
        self.client.invoke_blocking(&MEMPOOL_LIST, options)
    }

    /// Fetches the payloads of one mempool transaction.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`].
    pub async fn mempool_transaction(
        &self,
        request: &MempoolTransactionRequest,
        cancel: &CancellationToken,
    ) -> Result<MempoolTransactionResponse, ClientError> {
        self.mempool_transaction_with_response(request, cancel)
            .await
            .map(ApiResponse::into_data)
    }

    /// Fetches a mempool transaction, returning the full response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke`].
    pub async fn mempool_transaction_with_response(
        &self,
        request: &MempoolTransactionRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<MempoolTransactionResponse>, ClientError> {
        let options = transaction_options(request)?;
        self.client
            .invoke_async(&MEMPOOL_TRANSACTION, options, cancel)
            .await
    }

    /// Blocking form of [`MempoolApi::mempool_transaction`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke_blocking`].
    pub fn mempool_transaction_blocking(
        &self,
        request: &MempoolTransactionRequest,
    ) -> Result<MempoolTransactionResponse, ClientError> {
        self.mempool_transaction_with_response_blocking(request)
            .map(ApiResponse::into_data)
    }

    /// Blocking form of [`MempoolApi::mempool_transaction_with_response`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::invoke_blocking`].
    pub fn mempool_transaction_with_response_blocking(
        &self,
        request: &MempoolTransactionRequest,
    ) -> Result<ApiResponse<MempoolTransactionResponse>, ClientError> {
        let options = transaction_options(request)?;
        self.client.invoke_blocking(&MEMPOOL_TRANSACTION, options)
    }
}

fn list_options(
    request: &MempoolListRequest,
) -> Result<RequestOptions<&MempoolListRequest>, ClientError> {
    require_non_empty(&request.network, field::NETWORK, MEMPOOL_LIST.name)?;
    build_options(
        Some(request),
        MEMPOOL_LIST.content_types,
        MEMPOOL_LIST.accepts,
        no_path_params(),
    )
}

fn transaction_options(
    request: &MempoolTransactionRequest,
) -> Result<RequestOptions<&MempoolTransactionRequest>, ClientError> {
    require_non_empty(&request.network, field::NETWORK, MEMPOOL_TRANSACTION.name)?;
    require_non_empty(
        &request.payload_hash,
        field::PAYLOAD_HASH,
        MEMPOOL_TRANSACTION.name,
    )?;
    build_options(
        Some(request),
        MEMPOOL_TRANSACTION.content_types,
        MEMPOOL_TRANSACTION.accepts,
        no_path_params(),
    )
}

const fn no_path_params() -> [(&'static str, &'static str); 0] {
    []
}
