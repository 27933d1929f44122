//! Triage error types

use std::time::Duration;

use serde::Serialize;

/// Triage error types
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("completion call timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("empty response from model")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request body exceeds the {limit}-byte upload limit")]
    PayloadTooLarge { limit: usize },

    // Configuration errors
    #[error("no completion provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Closed set of failure categories exposed to callers.
///
/// The HTTP envelope carries this next to the human-readable message so
/// clients can branch on the cause without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request itself was malformed (unknown mode, empty payload,
    /// oversized upload).
    InvalidInput,
    /// The completion provider failed: network, auth, rate limit, timeout,
    /// or a response without content.
    RemoteCallFailure,
    /// The process is misconfigured (missing credential, no provider).
    Configuration,
}

impl TriageError {
    /// Categorise this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TriageError::InvalidInput(_) | TriageError::PayloadTooLarge { .. } => {
                ErrorKind::InvalidInput
            }
            TriageError::NoProvider | TriageError::Configuration(_) => ErrorKind::Configuration,
            TriageError::Http(_)
            | TriageError::Api { .. }
            | TriageError::RateLimited { .. }
            | TriageError::AuthenticationFailed
            | TriageError::Timeout { .. }
            | TriageError::EmptyResponse
            | TriageError::Json(_) => ErrorKind::RemoteCallFailure,
        }
    }
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;
