//! Application execution logic.
//!
//! This module performs the requested remote call and renders its result
//! to stdout.

use http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use core_api_client::api::{MempoolApi, MempoolListRequest, MempoolTransactionRequest};
use core_api_client::client::ApiResponse;
use core_api_client::config::{Action, Configuration, ValidatedConfig};
use core_api_client::error::ClientError;
use core_api_client::exception::StatusCodeTranslator;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The remote call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The response could not be rendered.
    #[error("Failed to render response: {0}")]
    Render(#[source] serde_json::Error),
}

/// Executes the requested operation.
///
/// This function:
/// 1. Merges the command-line override over the process-wide default
/// 2. Installs the status-code translator when strict mode is on
/// 3. Performs the call, cancelling it on Ctrl+C
/// 4. Prints the result as pretty JSON
///
/// # Errors
///
/// Returns an error if the client cannot be built, the call fails, or the
/// result cannot be rendered.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a live
/// node and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let defaults = Configuration::global_default();
    let mut api = MempoolApi::with_configuration(Some(&defaults), Some(&config.overrides))?;

    if config.strict {
        api.set_exception_factory(StatusCodeTranslator);
    }
    tracing::debug!("Resolved {}", api.client().configuration());

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_shutdown(cancel.clone()));

    let rendered = match config.action {
        Action::MempoolList { network } => {
            let request = MempoolListRequest::new(network);
            let response = api.mempool_list_with_response(&request, &cancel).await;
            response.map_err(RunError::from).and_then(|r| {
                render(&r, config.include_response).map_err(RunError::Render)
            })
        }
        Action::MempoolTransaction {
            network,
            payload_hash,
        } => {
            let request = MempoolTransactionRequest::new(network, payload_hash);
            let response = api.mempool_transaction_with_response(&request, &cancel).await;
            response.map_err(RunError::from).and_then(|r| {
                render(&r, config.include_response).map_err(RunError::Render)
            })
        }
    };

    watcher.abort();
    api.close();

    println!("{}", rendered?);
    Ok(())
}

/// Renders a response as pretty JSON.
///
/// With `include_response` the payload is wrapped together with the
/// status code and headers; otherwise only the payload is printed.
fn render<T: Serialize>(
    response: &ApiResponse<T>,
    include_response: bool,
) -> Result<String, serde_json::Error> {
    let data = serde_json::to_value(response.data())?;

    let value = if include_response {
        json!({
            "status": response.status().as_u16(),
            "headers": headers_to_json(response.headers()),
            "data": data,
        })
    } else {
        data
    };

    serde_json::to_string_pretty(&value)
}

/// Converts headers to a JSON object, skipping non-UTF-8 values.
///
/// Repeated headers keep their last value.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let map: Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
        })
        .collect();
    Value::Object(map)
}

/// Cancels `token` when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn cancel_on_shutdown(token: CancellationToken) {
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, cancelling call...");
    token.cancel();
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
