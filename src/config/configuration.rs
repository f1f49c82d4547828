//! Client configuration and its resolution against the process-wide default.
//!
//! A [`Configuration`] is a partial description: every field may be left
//! unset. Two of them exist per client, the process-wide default created
//! once at startup and an optional per-client override. [`Configuration::merge`]
//! folds them into a [`ResolvedConfiguration`] where every field is concrete.

use std::fmt;
use std::time::Duration;

use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use super::defaults;
use super::error::ConfigError;

/// Credentials for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name
    pub username: String,
    /// Optional password
    pub password: Option<String>,
}

impl BasicAuth {
    /// Creates basic credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Partial client configuration.
///
/// Unset fields (`None`, or an empty header map) defer to the other side
/// of a merge. Use [`Configuration::global_default`] for the conventional
/// process-wide default, and the `with_*` builders for overrides.
///
/// # Example
///
/// ```
/// use core_api_client::config::Configuration;
/// use std::time::Duration;
///
/// let defaults = Configuration::global_default();
/// let overrides = Configuration::for_base_path("http://node:3333/core")
///     .unwrap()
///     .with_timeout(Duration::from_secs(5));
///
/// let resolved = Configuration::merge(Some(&defaults), Some(&overrides)).unwrap();
/// assert_eq!(resolved.base_path.as_str(), "http://node:3333/core");
/// assert_eq!(resolved.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Target origin (and optional path prefix) of the Core API
    pub base_path: Option<Url>,
    /// Headers sent with every request unless the call sets them itself
    pub default_headers: HeaderMap,
    /// Whole-request timeout
    pub timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: Option<String>,
    /// Bearer token for the `Authorization` header
    pub access_token: Option<String>,
    /// Basic credentials for the `Authorization` header
    pub basic_auth: Option<BasicAuth>,
    /// Proxy every request goes through
    pub proxy: Option<Url>,
}

impl Configuration {
    /// Creates an empty configuration with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the conventional process-wide default.
    ///
    /// Base path `http://localhost`, a 100 second timeout and the library
    /// user agent. Build it once at startup and pass it by reference into
    /// every client.
    #[must_use]
    pub fn global_default() -> Self {
        Self {
            base_path: Url::parse(defaults::BASE_PATH).ok(),
            default_headers: HeaderMap::new(),
            timeout: Some(defaults::timeout()),
            user_agent: Some(defaults::USER_AGENT.to_string()),
            access_token: None,
            basic_auth: None,
            proxy: None,
        }
    }

    /// Creates an override carrying only a base path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_path` does not parse.
    pub fn for_base_path(base_path: &str) -> Result<Self, ConfigError> {
        Ok(Self::new().with_base_path(parse_url(base_path)?))
    }

    /// Sets the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: Url) -> Self {
        self.base_path = Some(base_path);
        self
    }

    /// Sets a default header, replacing any previous value for that name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the bearer access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, auth: BasicAuth) -> Self {
        self.basic_auth = Some(auth);
        self
    }

    /// Sets the proxy URL.
    #[must_use]
    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Merges a default configuration with an override.
    ///
    /// For every field the override wins when it is set; otherwise the
    /// default's value is used, and built-in [`defaults`] fill whatever
    /// neither side sets. Default headers merge per name, with the
    /// override's value winning on conflicts.
    ///
    /// Neither input is modified, and equal inputs always resolve to equal
    /// outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfiguration`] when both sides are absent.
    pub fn merge(
        default: Option<&Self>,
        overrides: Option<&Self>,
    ) -> Result<ResolvedConfiguration, ConfigError> {
        let (default, overrides) = match (default, overrides) {
            (None, None) => return Err(ConfigError::NoConfiguration),
            (Some(d), o) => (d, o),
            (None, Some(o)) => (o, None),
        };

        let base_path = match overrides
            .and_then(|c| c.base_path.as_ref())
            .or(default.base_path.as_ref())
        {
            Some(url) => url.clone(),
            None => parse_url(defaults::BASE_PATH)?,
        };

        let mut default_headers = default.default_headers.clone();
        if let Some(overrides) = overrides {
            for (name, value) in &overrides.default_headers {
                default_headers.insert(name.clone(), value.clone());
            }
        }

        let timeout = overrides
            .and_then(|c| c.timeout)
            .or(default.timeout)
            .unwrap_or_else(defaults::timeout);

        let user_agent = overrides
            .and_then(|c| c.user_agent.as_ref())
            .or(default.user_agent.as_ref())
            .map_or_else(|| defaults::USER_AGENT.to_string(), Clone::clone);

        let access_token = overrides
            .and_then(|c| c.access_token.as_ref())
            .or(default.access_token.as_ref())
            .cloned();

        let basic_auth = overrides
            .and_then(|c| c.basic_auth.as_ref())
            .or(default.basic_auth.as_ref())
            .cloned();

        let proxy = overrides
            .and_then(|c| c.proxy.as_ref())
            .or(default.proxy.as_ref())
            .cloned();

        Ok(ResolvedConfiguration {
            base_path,
            default_headers,
            timeout,
            user_agent,
            access_token,
            basic_auth,
            proxy,
        })
    }
}

/// Fully resolved configuration of one client.
///
/// Produced once at client construction by [`Configuration::merge`] and
/// shared read-only by every call made through that client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    /// Target origin (and optional path prefix) of the Core API
    pub base_path: Url,
    /// Headers sent with every request unless the call sets them itself
    pub default_headers: HeaderMap,
    /// Whole-request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Bearer token for the `Authorization` header
    pub access_token: Option<String>,
    /// Basic credentials for the `Authorization` header
    pub basic_auth: Option<BasicAuth>,
    /// Proxy every request goes through
    pub proxy: Option<Url>,
}

impl ResolvedConfiguration {
    /// Resolves the process-wide default alone.
    ///
    /// # Errors
    ///
    /// See [`Configuration::merge`].
    pub fn from_default(default: &Configuration) -> Result<Self, ConfigError> {
        Configuration::merge(Some(default), None)
    }
}

impl From<ResolvedConfiguration> for Configuration {
    fn from(resolved: ResolvedConfiguration) -> Self {
        Self {
            base_path: Some(resolved.base_path),
            default_headers: resolved.default_headers,
            timeout: Some(resolved.timeout),
            user_agent: Some(resolved.user_agent),
            access_token: resolved.access_token,
            basic_auth: resolved.basic_auth,
            proxy: resolved.proxy,
        }
    }
}

impl fmt::Display for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proxy = self
            .proxy
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        let auth = match (&self.access_token, &self.basic_auth) {
            (Some(_), _) => "bearer",
            (None, Some(_)) => "basic",
            (None, None) => "none",
        };

        write!(
            f,
            "Config {{ base_path: {}, timeout: {}s, user_agent: {}, headers: {}, auth: {}, proxy: {} }}",
            self.base_path,
            self.timeout.as_secs(),
            self.user_agent,
            self.default_headers.len(),
            auth,
            proxy,
        )
    }
}

pub(crate) fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        url: value.to_string(),
        reason: e.to_string(),
    })
}
