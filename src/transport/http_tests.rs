//! Tests for HTTP request/response types.

use std::sync::Arc;

use super::test_fixtures::StubClient;
use super::{HttpClient, HttpRequest, HttpResponse, TransportError};

fn test_url() -> url::Url {
    url::Url::parse("http://localhost:3333/core/mempool/list").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PUT, test_url());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, test_url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_creates_post_request() {
        let req = HttpRequest::post(test_url());
        assert_eq!(req.method, http::Method::POST);
    }

    #[test]
    fn with_body_sets_body() {
        let body = br#"{"network":"mainnet"}"#.to_vec();
        let req = HttpRequest::post(test_url()).with_body(body.clone());

        assert_eq!(req.body, Some(body));
    }

    #[test]
    fn with_header_replaces_previous_value() {
        let req = HttpRequest::post(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 1);
        assert_eq!(req.headers[http::header::ACCEPT], "application/json");
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_for_2xx() {
        let ok = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![]);
        let created = HttpResponse::new(http::StatusCode::CREATED, http::HeaderMap::new(), vec![]);

        assert!(ok.is_success());
        assert!(created.is_success());
    }

    #[test]
    fn is_not_success_for_errors() {
        let not_found =
            HttpResponse::new(http::StatusCode::NOT_FOUND, http::HeaderMap::new(), vec![]);
        let server =
            HttpResponse::new(http::StatusCode::BAD_GATEWAY, http::HeaderMap::new(), vec![]);

        assert!(!not_found.is_success());
        assert!(!server.is_success());
    }

    #[test]
    fn body_text_returns_utf8() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"{\"count\":0}".to_vec(),
        );

        assert_eq!(response.body_text(), Some("{\"count\":0}"));
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let response =
            HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![0xFF, 0xFE]);

        assert_eq!(response.body_text(), None);
    }
}

mod http_client_trait {
    use super::*;

    #[tokio::test]
    async fn arc_delegates_to_inner_client() {
        let stub = Arc::new(StubClient::ok());
        let shared = Arc::clone(&stub);

        let response = shared.request(HttpRequest::post(test_url())).await.unwrap();

        assert_eq!(response.status, http::StatusCode::OK);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn failures_surface_as_transport_errors() {
        let stub = StubClient::failing();

        let result = stub.request(HttpRequest::post(test_url())).await;

        assert!(matches!(result, Err(TransportError::Timeout)));
    }
}

mod transport_error {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(TransportError::Timeout.to_string(), "Request timed out");
        assert_eq!(TransportError::Closed.to_string(), "Client is closed");
        assert!(
            TransportError::InvalidUrl("x".to_string())
                .to_string()
                .contains("Invalid URL")
        );
        assert!(
            TransportError::BlockingInAsyncContext
                .to_string()
                .contains("async runtime")
        );
    }

    #[test]
    fn connection_error_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = TransportError::Connection(Box::new(io));

        assert!(error.to_string().contains("refused"));
        assert!(error.source().is_some());
    }
}
