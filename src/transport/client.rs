//! Production transport implementation using reqwest.

use crate::config::{ConfigError, ResolvedConfiguration};

use super::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` implementing [`HttpClient`].
/// The inner client owns the connection pool; dropping the last clone
/// releases it.
///
/// # Example
///
/// ```no_run
/// use core_api_client::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("http://localhost:3333/core/mempool/list")?;
/// let request = HttpRequest::post(url).with_body(br#"{"network":"mainnet"}"#.to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with reqwest's default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need TLS or pooling settings the configuration
    /// surface does not expose.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Creates an HTTP client tuned by a resolved configuration.
    ///
    /// Applies the timeout, user agent and optional proxy. Headers and
    /// authentication are applied per request by the executor, not here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProxy`] if the proxy URL is rejected,
    /// or [`ConfigError::HttpClient`] if reqwest cannot build the client.
    pub fn from_configuration(config: &ResolvedConfiguration) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());

        if let Some(proxy_url) = &config.proxy {
            let proxy =
                reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| ConfigError::InvalidProxy {
                    url: proxy_url.to_string(),
                    reason: e.to_string(),
                })?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { inner })
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::InvalidUrl(e.to_string())
            } else {
                TransportError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(Box::new(e))
                }
            })?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
