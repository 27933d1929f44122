//! Builder for configuring pipeline instances

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{ClassificationPipeline, Dispatch, FailurePolicy};
use crate::fusion::FusionRule;
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::providers::{CompletionProvider, DEFAULT_CALL_TIMEOUT, OpenAiClient, TimeoutProvider};
use crate::types::CompletionOptions;
use crate::{Result, TriageError};

/// Builder for [`ClassificationPipeline`].
///
/// ```rust,no_run
/// use disaster_triage::{ClassificationPipeline, FusionRule};
///
/// # fn main() -> disaster_triage::Result<()> {
/// let pipeline = ClassificationPipeline::builder()
///     .openai("sk-your-key")
///     .model("gpt-4o-mini")
///     .fusion_rule(FusionRule::Or)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PipelineBuilder {
    openai_key: Option<String>,
    base_url: Option<String>,
    provider: Option<Arc<dyn CompletionProvider>>,
    model: Option<String>,
    max_tokens: Option<usize>,
    timeout: Option<Duration>,
    fusion_rule: FusionRule,
    dispatch: Dispatch,
    failure_policy: FailurePolicy,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            openai_key: None,
            base_url: None,
            provider: None,
            model: None,
            max_tokens: None,
            timeout: Some(DEFAULT_CALL_TIMEOUT),
            fusion_rule: FusionRule::default(),
            dispatch: Dispatch::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Configure the OpenAI-compatible provider.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Point the OpenAI-compatible provider at another base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a custom provider instead of the OpenAI client.
    ///
    /// Takes precedence over [`openai`](Self::openai).
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Model name sent with every completion call.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Cap the reply length. One label needs only a handful of tokens.
    pub fn max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Bound each completion call (default: 60s).
    ///
    /// A zero timeout is rejected by [`build`](Self::build); use
    /// [`no_timeout`](Self::no_timeout) to lift the bound.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Let completion calls run as long as the provider takes.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn fusion_rule(mut self, rule: FusionRule) -> Self {
        self.fusion_rule = rule;
        self
    }

    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Build the pipeline.
    ///
    /// Fails with [`TriageError::NoProvider`] if neither a custom provider
    /// nor an API key was configured.
    /// Fails with [`TriageError::Configuration`] for a blank key or a zero
    /// timeout.
    pub fn build(self) -> Result<ClassificationPipeline> {
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(TriageError::Configuration(
                "completion timeout must be greater than zero".to_string(),
            ));
        }

        let provider: Arc<dyn CompletionProvider> = match (self.provider, self.openai_key) {
            (Some(provider), _) => provider,
            (None, Some(key)) => {
                if key.trim().is_empty() {
                    return Err(TriageError::Configuration(
                        "provider API key is empty".to_string(),
                    ));
                }
                let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
                Arc::new(OpenAiClient::with_base_url(key, base_url)?)
            }
            (None, None) => return Err(TriageError::NoProvider),
        };

        let provider: Arc<dyn CompletionProvider> = match self.timeout {
            Some(timeout) => Arc::new(TimeoutProvider::new(provider, timeout)),
            None => provider,
        };

        let mut options = CompletionOptions::default();
        if let Some(model) = self.model {
            options = options.model(model);
        }
        if let Some(max) = self.max_tokens {
            options = options.max_tokens(max);
        }

        info!(
            provider = provider.name(),
            model = %options.model,
            fusion_rule = %self.fusion_rule,
            dispatch = %self.dispatch,
            failure_policy = %self.failure_policy,
            "classification pipeline ready"
        );

        Ok(ClassificationPipeline::new(provider, options)
            .with_fusion_rule(self.fusion_rule)
            .with_dispatch(self.dispatch)
            .with_failure_policy(self.failure_policy))
    }
}
