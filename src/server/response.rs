//! JSON envelopes returned by the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::types::{FusionResult, Mode};
use crate::TriageError;

/// Successful classification.
///
/// `results` serializes as `{text_label, image_label, final_label}` with
/// absent modalities as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub mode: Mode,
    pub results: FusionResult,
}

impl ClassifyResponse {
    pub fn new(mode: Mode, results: FusionResult) -> Self {
        Self {
            success: true,
            mode,
            results,
        }
    }
}

/// Failed classification.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&TriageError> for ErrorResponse {
    fn from(err: &TriageError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// HTTP status for an error.
///
/// Bad requests are the caller's fault (413 for an oversized upload, 400
/// otherwise); everything else is reported as a server error.
pub fn status_for(err: &TriageError) -> StatusCode {
    match (err, err.kind()) {
        (TriageError::PayloadTooLarge { .. }, _) => StatusCode::PAYLOAD_TOO_LARGE,
        (_, ErrorKind::InvalidInput) => StatusCode::BAD_REQUEST,
        (_, ErrorKind::RemoteCallFailure | ErrorKind::Configuration) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for TriageError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ErrorResponse::from(&self))).into_response()
    }
}
