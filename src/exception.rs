//! Exception translation policy.
//!
//! After every completed call the endpoint facade hands the raw response
//! to the client's [`ExceptionSlot`]. An installed [`ExceptionFactory`]
//! may turn it into an [`ApiError`]; with no factory installed every
//! response, whatever its status, is returned to the caller as a success.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ConfigError;
use crate::error::ApiError;
use crate::transport::HttpResponse;

#[cfg(test)]
#[path = "exception_tests.rs"]
mod tests;

/// Converts a received response into an application-level failure.
///
/// Implemented for any `Fn(&str, &HttpResponse) -> Option<ApiError>`.
///
/// # Example
///
/// ```
/// use core_api_client::error::ApiError;
/// use core_api_client::exception::{ExceptionFactory, ExceptionSlot};
/// use core_api_client::transport::HttpResponse;
///
/// let slot = ExceptionSlot::new();
/// slot.set(|operation: &str, response: &HttpResponse| {
///     (response.status == http::StatusCode::NOT_FOUND)
///         .then(|| ApiError::new(response.status, operation, "not found"))
/// });
/// assert!(slot.is_installed());
/// ```
pub trait ExceptionFactory: Send + Sync {
    /// Returns the failure to raise for `response`, or `None` to let the
    /// call succeed.
    fn translate(&self, operation: &str, response: &HttpResponse) -> Option<ApiError>;
}

impl<F> ExceptionFactory for F
where
    F: Fn(&str, &HttpResponse) -> Option<ApiError> + Send + Sync,
{
    fn translate(&self, operation: &str, response: &HttpResponse) -> Option<ApiError> {
        self(operation, response)
    }
}

/// Raises an [`ApiError`] for every status of 400 or above.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeTranslator;

impl ExceptionFactory for StatusCodeTranslator {
    fn translate(&self, operation: &str, response: &HttpResponse) -> Option<ApiError> {
        if response.status.as_u16() < 400 {
            return None;
        }

        let body = String::from_utf8_lossy(&response.body).into_owned();
        Some(
            ApiError::new(
                response.status,
                operation,
                format!("Error calling {operation}: {body}"),
            )
            .with_body(body)
            .with_headers(response.headers.clone()),
        )
    }
}

/// Single slot holding the active exception factory of a client.
///
/// At most one factory is active. [`ExceptionSlot::set`] replaces the
/// current one; [`ExceptionSlot::add`] refuses to stack a second factory.
/// Calls in flight while the slot changes see either the old or the new
/// factory.
#[derive(Default)]
pub struct ExceptionSlot {
    factory: RwLock<Option<Arc<dyn ExceptionFactory>>>,
}

impl ExceptionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot holding `factory`.
    #[must_use]
    pub fn with_factory(factory: impl ExceptionFactory + 'static) -> Self {
        Self {
            factory: RwLock::new(Some(Arc::new(factory))),
        }
    }

    /// Installs `factory`, replacing any existing one.
    ///
    /// Returns true if a factory was replaced.
    pub fn set(&self, factory: impl ExceptionFactory + 'static) -> bool {
        self.set_shared(Arc::new(factory))
    }

    /// Installs an already shared factory, replacing any existing one.
    ///
    /// Returns true if a factory was replaced.
    pub fn set_shared(&self, factory: Arc<dyn ExceptionFactory>) -> bool {
        let mut slot = self.factory.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(factory).is_some()
    }

    /// Installs `factory` only if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MulticastExceptionFactory`] if a factory is
    /// already installed; the slot is left unchanged.
    pub fn add(&self, factory: impl ExceptionFactory + 'static) -> Result<(), ConfigError> {
        let mut slot = self.factory.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(ConfigError::MulticastExceptionFactory);
        }
        *slot = Some(Arc::new(factory));
        Ok(())
    }

    /// Removes the installed factory, returning it.
    pub fn clear(&self) -> Option<Arc<dyn ExceptionFactory>> {
        self.factory
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns true if a factory is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.factory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the installed factory.
    #[must_use]
    pub fn current(&self) -> Option<Arc<dyn ExceptionFactory>> {
        self.factory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs the installed factory against a response.
    ///
    /// The lock is released before the factory runs, so a factory may
    /// itself replace the slot's contents.
    #[must_use]
    pub fn translate(&self, operation: &str, response: &HttpResponse) -> Option<ApiError> {
        self.current()?.translate(operation, response)
    }
}

impl fmt::Debug for ExceptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionSlot")
            .field("installed", &self.is_installed())
            .finish()
    }
}
