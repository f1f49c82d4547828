//! Tests for request execution and URL resolution.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use http::header::{AUTHORIZATION, HeaderName, HeaderValue, USER_AGENT};
use http::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::test_fixtures::StubClient;
use super::{
    ExecutionMode, Executor, HttpClient, HttpRequest, HttpResponse, TransportError, resolve_url,
};
use crate::config::{BasicAuth, Configuration, ResolvedConfiguration};
use crate::error::ClientError;
use crate::operation::Operation;
use crate::request::RequestOptions;

static RECEIPT: Operation = Operation::json_post("receipt", "/receipt/{id}", "receipt_request");
static LIST: Operation = Operation::json_post("mempool_list", "/mempool/list", "body");

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn config(overrides: Configuration) -> ResolvedConfiguration {
    Configuration::merge(Some(&Configuration::global_default()), Some(&overrides)).unwrap()
}

fn node_config() -> ResolvedConfiguration {
    config(Configuration::for_base_path("http://node:3333/core").unwrap())
}

fn options() -> RequestOptions<Vec<u8>> {
    RequestOptions::new().with_body(br#"{"network":"mainnet"}"#.to_vec())
}

mod url_resolution {
    use super::*;

    fn resolve(base: &str, template: &str) -> Result<Url, ClientError> {
        resolve_url(&url(base), template, &BTreeMap::new(), &[], "op")
    }

    #[test]
    fn joins_base_path_prefix_and_template() {
        let resolved = resolve("http://node:3333/core", "/mempool/list").unwrap();
        assert_eq!(resolved.as_str(), "http://node:3333/core/mempool/list");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let resolved = resolve("http://node:3333/core/", "/mempool/list").unwrap();
        assert_eq!(resolved.as_str(), "http://node:3333/core/mempool/list");
    }

    #[test]
    fn root_base_path() {
        let resolved = resolve("http://localhost", "/mempool/transaction").unwrap();
        assert_eq!(resolved.as_str(), "http://localhost/mempool/transaction");
    }

    #[test]
    fn path_params_are_substituted_and_encoded() {
        let params = BTreeMap::from([("id".to_string(), "a b/c".to_string())]);

        let resolved =
            resolve_url(&url("http://node/core"), "/receipt/{id}", &params, &[], "receipt").unwrap();

        assert_eq!(resolved.as_str(), "http://node/core/receipt/a%20b%2Fc");
    }

    #[test]
    fn missing_path_param_is_a_validation_error() {
        let result = resolve("http://node/core", "/receipt/{id}");

        match result {
            Err(ClientError::Validation {
                parameter,
                operation,
            }) => {
                assert_eq!(parameter, "id");
                assert_eq!(operation, "op");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn query_params_are_appended_in_order() {
        let query = vec![
            ("limit".to_string(), "10".to_string()),
            ("cursor".to_string(), "abc".to_string()),
        ];

        let resolved =
            resolve_url(&url("http://node/core"), "/mempool/list", &BTreeMap::new(), &query, "op")
                .unwrap();

        assert_eq!(
            resolved.as_str(),
            "http://node/core/mempool/list?limit=10&cursor=abc"
        );
    }

    #[test]
    fn opaque_base_is_rejected() {
        let result = resolve("mailto:node@example.com", "/mempool/list");

        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::InvalidUrl(_)))
        ));
    }
}

mod headers {
    use super::*;

    async fn sent_headers(
        config: &ResolvedConfiguration,
        options: RequestOptions<Vec<u8>>,
    ) -> http::HeaderMap {
        let stub = Arc::new(StubClient::ok());
        let executor = Executor::new(Arc::clone(&stub)).unwrap();

        executor
            .execute(&LIST, options, config, ExecutionMode::Blocking)
            .await
            .unwrap();

        stub.last_request().unwrap().headers
    }

    #[tokio::test]
    async fn request_carries_method_url_and_body() {
        let stub = Arc::new(StubClient::ok());
        let executor = Executor::new(Arc::clone(&stub)).unwrap();

        executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Blocking)
            .await
            .unwrap();

        let request = stub.last_request().unwrap();
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.url.as_str(), "http://node:3333/core/mempool/list");
        assert_eq!(request.body.as_deref(), Some(&br#"{"network":"mainnet"}"#[..]));
    }

    #[tokio::test]
    async fn default_headers_and_user_agent_are_applied() {
        let config = config(
            Configuration::new()
                .with_header(
                    HeaderName::from_static("x-default"),
                    HeaderValue::from_static("d"),
                )
                .with_user_agent("mempool-watch/1.0"),
        );

        let headers = sent_headers(&config, options()).await;

        assert_eq!(headers["x-default"], "d");
        assert_eq!(headers[USER_AGENT], "mempool-watch/1.0");
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[tokio::test]
    async fn call_headers_override_defaults() {
        let config = config(Configuration::new().with_header(
            HeaderName::from_static("x-shared"),
            HeaderValue::from_static("default"),
        ));
        let options = options().with_header(
            HeaderName::from_static("x-shared"),
            HeaderValue::from_static("call"),
        );

        let headers = sent_headers(&config, options).await;

        assert_eq!(headers["x-shared"], "call");
    }

    #[tokio::test]
    async fn multi_valued_call_header_replaces_defaults_as_a_group() {
        let name = HeaderName::from_static("x-trace");
        let config = config(
            Configuration::new().with_header(name.clone(), HeaderValue::from_static("default")),
        );
        let mut options = options();
        options
            .headers
            .append(name.clone(), HeaderValue::from_static("first"));
        options
            .headers
            .append(name.clone(), HeaderValue::from_static("second"));

        let headers = sent_headers(&config, options).await;

        let values: Vec<_> = headers.get_all(&name).iter().collect();
        assert_eq!(values, ["first", "second"]);
    }

    #[tokio::test]
    async fn bearer_token_sets_sensitive_authorization() {
        let config = config(Configuration::new().with_access_token("abc"));

        let headers = sent_headers(&config, options()).await;

        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[tokio::test]
    async fn basic_auth_is_base64_encoded() {
        let config = config(
            Configuration::new().with_basic_auth(BasicAuth::new("admin", Some("pw".to_string()))),
        );

        let headers = sent_headers(&config, options()).await;

        assert_eq!(headers[AUTHORIZATION], "Basic YWRtaW46cHc=");
    }

    #[tokio::test]
    async fn basic_auth_without_password() {
        let config = config(Configuration::new().with_basic_auth(BasicAuth::new("admin", None)));

        let headers = sent_headers(&config, options()).await;

        assert_eq!(headers[AUTHORIZATION], "Basic YWRtaW46");
    }

    #[tokio::test]
    async fn bearer_wins_over_basic() {
        let config = config(
            Configuration::new()
                .with_access_token("abc")
                .with_basic_auth(BasicAuth::new("admin", None)),
        );

        let headers = sent_headers(&config, options()).await;

        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }

    #[tokio::test]
    async fn explicit_authorization_is_not_replaced() {
        let config = config(Configuration::new().with_access_token("abc"));
        let options =
            options().with_header(AUTHORIZATION, HeaderValue::from_static("Custom xyz"));

        let headers = sent_headers(&config, options).await;

        assert_eq!(headers[AUTHORIZATION], "Custom xyz");
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn cancelled_before_dispatch_sends_nothing() {
        let stub = Arc::new(StubClient::ok());
        let executor = Executor::new(Arc::clone(&stub)).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Cancellable(&token))
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled { .. })));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn cancelled_in_flight_abandons_the_call() {
        let stub = Arc::new(StubClient::hanging());
        let executor = Executor::new(Arc::clone(&stub)).unwrap();
        let token = CancellationToken::new();
        let config = node_config();

        let (result, ()) = tokio::join!(
            executor.execute(&LIST, options(), &config, ExecutionMode::Cancellable(&token)),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                token.cancel();
            }
        );

        match result {
            Err(ClientError::Cancelled { operation }) => assert_eq!(operation, "mempool_list"),
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert_eq!(stub.calls(), 1);
    }

    /// Fires the token while producing its response.
    struct CancellingClient {
        token: CancellationToken,
    }

    impl HttpClient for CancellingClient {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.token.cancel();
            Ok(HttpResponse::new(StatusCode::OK, http::HeaderMap::new(), vec![]))
        }
    }

    #[tokio::test]
    async fn ready_response_wins_over_cancellation() {
        let token = CancellationToken::new();
        let executor = Executor::new(CancellingClient {
            token: token.clone(),
        })
        .unwrap();

        let result = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Cancellable(&token))
            .await;

        assert!(token.is_cancelled());
        assert_eq!(result.unwrap().status, StatusCode::OK);
    }

    #[tokio::test]
    async fn uncancelled_token_returns_response() {
        let executor = Executor::new(StubClient::ok()).unwrap();
        let token = CancellationToken::new();

        let response = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Cancellable(&token))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
    }
}

mod outcomes {
    use super::*;

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let executor =
            Executor::new(StubClient::json(StatusCode::INTERNAL_SERVER_ERROR, "{}")).unwrap();

        let response = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Blocking)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let executor = Executor::new(StubClient::failing()).unwrap();

        let result = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Blocking)
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::Timeout))
        ));
    }

    #[tokio::test]
    async fn missing_path_param_fails_before_dispatch() {
        let stub = Arc::new(StubClient::ok());
        let executor = Executor::new(Arc::clone(&stub)).unwrap();

        let result = executor
            .execute(&RECEIPT, options(), &node_config(), ExecutionMode::Blocking)
            .await;

        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(stub.calls(), 0);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn block_on_runs_future_outside_runtime() {
        let executor = Executor::new(StubClient::ok()).unwrap();
        assert_eq!(executor.block_on(async { 1 + 1 }).unwrap(), 2);
    }

    #[test]
    fn blocking_execute_outside_runtime() {
        let executor = Executor::new(StubClient::ok()).unwrap();
        let config = node_config();

        let response = executor
            .block_on(executor.execute(&LIST, options(), &config, ExecutionMode::Blocking))
            .unwrap()
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn block_on_inside_runtime_is_rejected() {
        let executor = Executor::new(StubClient::ok()).unwrap();

        let result = executor.block_on(async {});

        assert!(matches!(
            result,
            Err(TransportError::BlockingInAsyncContext)
        ));
    }

    #[test]
    fn release_is_idempotent() {
        let mut executor = Executor::new(StubClient::ok()).unwrap();
        assert!(!executor.is_released());

        executor.release();
        executor.release();

        assert!(executor.is_released());
        assert!(executor.client().is_none());
    }

    #[test]
    fn block_on_after_release_fails() {
        let mut executor = Executor::new(StubClient::ok()).unwrap();
        executor.release();

        assert!(matches!(
            executor.block_on(async {}),
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn execute_after_release_fails_without_io() {
        let stub = Arc::new(StubClient::ok());
        let mut executor = Executor::new(Arc::clone(&stub)).unwrap();
        executor.release();

        let result = executor
            .execute(&LIST, options(), &node_config(), ExecutionMode::Blocking)
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::Closed))
        ));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn release_inside_runtime_does_not_panic() {
        let mut executor = Executor::new(StubClient::ok()).unwrap();
        executor.release();
        drop(executor);
    }
}
