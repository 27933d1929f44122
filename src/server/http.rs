//! HTTP routes.
//!
//! - `POST /api/classify`: multipart form with `mode`, `text` and `image`
//! - `GET /health`: liveness and build version

use std::sync::Arc;
use std::time::Duration;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use super::config::ServerConfig;
use super::response::ClassifyResponse;
use crate::pipeline::ClassificationPipeline;
use crate::types::Mode;
use crate::{Result, TriageError};

/// Shared state for all handlers.
pub struct AppState {
    pipeline: ClassificationPipeline,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: ClassificationPipeline, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            max_upload_bytes,
        }
    }
}

/// Build the application router.
///
/// The upload limit is enforced by the multipart extractor so that an
/// oversized body still gets the JSON failure envelope.
pub fn router(pipeline: ClassificationPipeline, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(pipeline, config.max_upload_bytes));

    Router::new()
        .route("/api/classify", post(classify))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

/// Raw form fields of a classify request.
#[derive(Debug, Default)]
struct ClassifyForm {
    mode: Option<String>,
    text: Option<String>,
    image: Option<Vec<u8>>,
}

impl ClassifyForm {
    async fn read(mut multipart: Multipart, limit: usize) -> Result<Self> {
        let mut form = ClassifyForm::default();
        let field_error = |err: MultipartError| form_error(err, limit);

        while let Some(field) = multipart.next_field().await.map_err(field_error)? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("mode") => form.mode = Some(field.text().await.map_err(field_error)?),
                Some("text") => form.text = Some(field.text().await.map_err(field_error)?),
                Some("image") => {
                    form.image = Some(field.bytes().await.map_err(field_error)?.to_vec())
                }
                // unknown fields are ignored
                _ => {}
            }
        }

        Ok(form)
    }

    /// Requested mode; missing or blank means `both`.
    fn mode(&self) -> Result<Mode> {
        match self.mode.as_deref().map(str::trim) {
            None | Some("") => Ok(Mode::default()),
            Some(mode) => mode.parse(),
        }
    }
}

fn invalid_form(err: impl std::fmt::Display) -> TriageError {
    TriageError::InvalidInput(format!("malformed multipart form: {err}"))
}

/// Map a multipart read error, separating the body limit from bad framing.
fn form_error(err: MultipartError, limit: usize) -> TriageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TriageError::PayloadTooLarge { limit }
    } else {
        invalid_form(err)
    }
}

async fn classify(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassifyResponse>> {
    match handle_classify(&state, multipart).await {
        Ok(response) => {
            info!(
                mode = %response.mode,
                final_label = %response.results.final_label,
                "classification complete"
            );
            Ok(Json(response))
        }
        Err(e) => {
            warn!(error = %e, kind = ?e.kind(), "classification failed");
            Err(e)
        }
    }
}

async fn handle_classify(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<ClassifyResponse> {
    let multipart = multipart.map_err(invalid_form)?;
    let form = ClassifyForm::read(multipart, state.max_upload_bytes).await?;
    let mode = form.mode()?;
    let results = state
        .pipeline
        .run(mode, form.text.as_deref(), form.image.as_deref())
        .await?;
    Ok(ClassifyResponse::new(mode, results))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::version_string(),
    }))
}

fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    cors.max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_mode_defaults_to_both() {
        assert_eq!(ClassifyForm::default().mode().unwrap(), Mode::Both);
        let form = ClassifyForm {
            mode: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(form.mode().unwrap(), Mode::Both);
    }

    #[test]
    fn bad_mode_is_invalid_input() {
        let form = ClassifyForm {
            mode: Some("video".to_string()),
            ..Default::default()
        };
        assert!(matches!(form.mode(), Err(TriageError::InvalidInput(_))));
    }
}
