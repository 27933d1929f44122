use std::time::Duration;

use disaster_triage::{ErrorKind, Mode, TriageError};

#[test]
fn test_error_display() {
    let err = TriageError::InvalidInput("unknown mode".to_string());
    assert_eq!(err.to_string(), "invalid input: unknown mode");

    let err = TriageError::Api {
        status: 500,
        message: "Internal error".to_string(),
    };
    assert_eq!(err.to_string(), "API error (500): Internal error");

    let err = TriageError::Timeout {
        after: Duration::from_secs(60),
    };
    assert_eq!(err.to_string(), "completion call timed out after 60s");
}

#[test]
fn test_error_kinds() {
    assert_eq!(
        TriageError::InvalidInput("x".into()).kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(
        TriageError::Configuration("x".into()).kind(),
        ErrorKind::Configuration
    );
    assert_eq!(TriageError::NoProvider.kind(), ErrorKind::Configuration);
    assert_eq!(
        TriageError::PayloadTooLarge { limit: 1024 }.kind(),
        ErrorKind::InvalidInput
    );

    for err in [
        TriageError::Http("connection reset".into()),
        TriageError::AuthenticationFailed,
        TriageError::RateLimited { retry_after: None },
        TriageError::EmptyResponse,
        TriageError::Timeout {
            after: Duration::from_secs(1),
        },
    ] {
        assert_eq!(err.kind(), ErrorKind::RemoteCallFailure, "{err}");
    }
}

#[test]
fn test_error_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(ErrorKind::RemoteCallFailure).unwrap(),
        "remote_call_failure"
    );
    assert_eq!(
        serde_json::to_value(ErrorKind::InvalidInput).unwrap(),
        "invalid_input"
    );
}

#[test]
fn test_unknown_mode_is_invalid_input() {
    let err = "video".parse::<Mode>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: TriageError = json_err.into();
    assert!(matches!(err, TriageError::Json(_)));
}
