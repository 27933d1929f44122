//! OpenAI-compatible chat-completions client.
//!
//! Talks to `POST {base_url}/chat/completions` with bearer authentication.
//! Any server that speaks the same wire format (OpenAI, OpenRouter, a local
//! vLLM) works by pointing `base_url` at it.
//! See: <https://platform.openai.com/docs/api-reference/chat/create>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::traits::CompletionProvider;
use crate::types::{CompletionOptions, Message};
use crate::{Result, TriageError};

/// Default base URL for the OpenAI API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Transport-level timeout applied by the HTTP client itself.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI chat-completions API.
///
/// Cheap to clone: the underlying `reqwest::Client` shares one connection
/// pool across clones.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for compatible servers and
    /// for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| TriageError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(api_key, base_url, http))
    }

    /// Create a client sharing an existing HTTP connection pool.
    pub fn with_http_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion and return the first choice's text.
    ///
    /// A choice whose content is `null` (refusals, tool calls) is reported
    /// as `EmptyResponse`; an empty string is returned as-is.
    #[instrument(name = "openai.complete", skip(self, messages, options), fields(model = %options.model))]
    pub async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &options.model,
                messages,
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            })
            .send()
            .await
            .map_err(|e| TriageError::Http(e.to_string()))?;

        let response = Self::handle_response_errors(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TriageError::Http(e.to_string()))?;
        let body: CompletionResponse = serde_json::from_slice(&bytes)?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(TriageError::EmptyResponse)
    }

    /// Check response status and map to appropriate error.
    ///
    /// On failure the body is read to surface the provider's own message.
    async fn handle_response_errors(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(TriageError::AuthenticationFailed),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(TriageError::RateLimited { retry_after })
            }
            code => {
                let message = response
                    .json::<ErrorResponse>()
                    .await
                    .map(|body| body.error.message)
                    .unwrap_or_else(|_| format!("completion API error: {status}"));
                Err(TriageError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<String> {
        OpenAiClient::complete(self, messages, options).await
    }
}
