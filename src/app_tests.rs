//! Tests for exit-code classification and hints.

use super::*;

use core_api_client::error::ApiError;
use http::StatusCode;

fn client(error: ClientError) -> RunError {
    RunError::from(error)
}

fn decode_failure(status: StatusCode) -> RunError {
    let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    client(ClientError::Deserialization {
        operation: "mempool_list".to_string(),
        status,
        source,
    })
}

mod outcome {
    use super::*;

    #[test]
    fn configuration_and_validation_exit_1() {
        let error = client(ClientError::Configuration(ConfigError::NoConfiguration));
        assert_eq!(Outcome::of(&error), Outcome::Configuration);

        let error = client(ClientError::missing_parameter("network", "mempool_list"));
        assert_eq!(Outcome::of(&error), Outcome::Configuration);
        assert_eq!(Outcome::Configuration.code(), 1);
    }

    #[test]
    fn rejected_status_is_distinct_from_transport_failure() {
        let rejected = client(ClientError::Api(ApiError::new(
            StatusCode::NOT_FOUND,
            "mempool_list",
            "Error calling mempool_list: Not found",
        )));
        let timeout = client(ClientError::Transport(TransportError::Timeout));

        assert_eq!(Outcome::of(&rejected).code(), 3);
        assert_eq!(Outcome::of(&timeout).code(), 2);
    }

    #[test]
    fn cancellation_exits_130() {
        let error = client(ClientError::Cancelled {
            operation: "mempool_list".to_string(),
        });

        assert_eq!(Outcome::of(&error), Outcome::Cancelled);
        assert_eq!(Outcome::Cancelled.code(), 130);
    }

    #[test]
    fn undecodable_payload_is_a_runtime_error() {
        assert_eq!(
            Outcome::of(&decode_failure(StatusCode::OK)),
            Outcome::Runtime
        );
    }
}

mod hints {
    use super::*;

    #[test]
    fn missing_network_points_at_init() {
        let error = ConfigError::missing(field::NETWORK, "Use --network");
        assert!(config_hint(&error).unwrap().contains("core-api init"));
    }

    #[test]
    fn unrelated_config_errors_have_no_hint() {
        assert!(config_hint(&ConfigError::NoConfiguration).is_none());
    }

    #[test]
    fn timeout_suggests_raising_it() {
        let error = client(ClientError::Transport(TransportError::Timeout));
        assert!(failure_hint(&error).unwrap().contains("--timeout"));
    }

    #[test]
    fn rejection_names_the_status() {
        let error = client(ClientError::Api(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "mempool_list",
            "boom",
        )));
        assert!(failure_hint(&error).unwrap().contains("500"));
    }

    #[test]
    fn error_body_without_strict_suggests_strict() {
        let hint = failure_hint(&decode_failure(StatusCode::NOT_FOUND)).unwrap();
        assert!(hint.contains("404"));
        assert!(hint.contains("--strict"));
    }

    #[test]
    fn bad_payload_on_success_has_no_hint() {
        assert!(failure_hint(&decode_failure(StatusCode::OK)).is_none());
    }

    #[test]
    fn cancellation_has_no_hint() {
        let error = client(ClientError::Cancelled {
            operation: "mempool_list".to_string(),
        });
        assert!(failure_hint(&error).is_none());
    }
}
