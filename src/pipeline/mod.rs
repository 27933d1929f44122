//! Classification pipeline: mode gating, fan-out and fusion.
//!
//! One [`ClassificationPipeline`] is built at startup and shared by every
//! request. It holds no per-request state; each call to
//! [`run`](ClassificationPipeline::run) is independent.
//!
//! # Flow
//!
//! 1. A modality is classified only if the mode asks for it *and* its input
//!    is present and non-empty. A requested but missing input is skipped,
//!    not an error.
//! 2. The text and image calls are independent. Under
//!    [`Dispatch::Concurrent`] they run together; under
//!    [`Dispatch::Sequential`] text runs first.
//! 3. The labels produced are fused by the configured [`FusionRule`].
//!
//! # Failures
//!
//! With [`FailurePolicy::Abort`] (the default) any provider error fails the
//! whole run and no partial result is returned. A concurrent sibling call
//! is dropped, which cancels its HTTP request. With
//! [`FailurePolicy::Degrade`] the failing modality is logged and reported
//! as absent, and fusion proceeds with what is left.

mod builder;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::{join, try_join};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use builder::PipelineBuilder;

use crate::classifier::{ImageClassifier, ModelClassifier, TextClassifier};
use crate::fusion::{FusionEngine, FusionRule};
use crate::providers::CompletionProvider;
use crate::telemetry;
use crate::types::{CompletionOptions, FusionResult, Label, Modality, ModalityRequest, Mode};
use crate::{Result, TriageError};

/// How the two modality calls are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dispatch {
    /// Run text and image calls at the same time.
    #[default]
    Concurrent,
    /// Run text first, then image.
    Sequential,
}

impl FromStr for Dispatch {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" => Ok(Dispatch::Concurrent),
            "sequential" => Ok(Dispatch::Sequential),
            other => Err(TriageError::Configuration(format!(
                "unknown dispatch '{other}', expected 'concurrent' or 'sequential'"
            ))),
        }
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dispatch::Concurrent => "concurrent",
            Dispatch::Sequential => "sequential",
        })
    }
}

/// What a provider failure in one modality does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Treat the failed modality as absent.
    Degrade,
}

impl FromStr for FailurePolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "degrade" => Ok(FailurePolicy::Degrade),
            other => Err(TriageError::Configuration(format!(
                "unknown failure policy '{other}', expected 'abort' or 'degrade'"
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Degrade => "degrade",
        })
    }
}

/// Root of the classification flow.
#[derive(Clone)]
pub struct ClassificationPipeline {
    text: TextClassifier,
    image: ImageClassifier,
    fusion: FusionEngine,
    dispatch: Dispatch,
    failure_policy: FailurePolicy,
}

impl ClassificationPipeline {
    /// Create a new builder for configuring the pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Pipeline over an existing provider with default policies.
    ///
    /// The provider is used as-is; no timeout is added.
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        let model = ModelClassifier::new(provider, options);
        Self {
            text: TextClassifier::new(model.clone()),
            image: ImageClassifier::new(model),
            fusion: FusionEngine::default(),
            dispatch: Dispatch::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_fusion_rule(mut self, rule: FusionRule) -> Self {
        self.fusion = FusionEngine::new(rule);
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn fusion_rule(&self) -> FusionRule {
        self.fusion.rule()
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Classify whichever requested inputs are present and fuse the labels.
    pub async fn run(
        &self,
        mode: Mode,
        text: Option<&str>,
        image: Option<&[u8]>,
    ) -> Result<FusionResult> {
        let start = Instant::now();
        let result = self.run_inner(mode, text, image).await;
        Self::record_run(mode, start, &result);
        result
    }

    async fn run_inner(
        &self,
        mode: Mode,
        text: Option<&str>,
        image: Option<&[u8]>,
    ) -> Result<FusionResult> {
        let text = Self::gate(mode, Modality::Text, text.filter(|t| !t.trim().is_empty()))
            .map(ModalityRequest::Text);
        let image = Self::gate(mode, Modality::Image, image.filter(|b| !b.is_empty()))
            .map(ModalityRequest::Image);

        let (text_label, image_label) = match (self.dispatch, self.failure_policy) {
            (Dispatch::Concurrent, FailurePolicy::Abort) => {
                try_join(self.classify_optional(text), self.classify_optional(image)).await?
            }
            (Dispatch::Concurrent, FailurePolicy::Degrade) => {
                let (t, i) =
                    join(self.classify_optional(text), self.classify_optional(image)).await;
                (
                    self.settle(Modality::Text, t)?,
                    self.settle(Modality::Image, i)?,
                )
            }
            (Dispatch::Sequential, _) => {
                let t = self.settle(Modality::Text, self.classify_optional(text).await)?;
                let i = self.settle(Modality::Image, self.classify_optional(image).await)?;
                (t, i)
            }
        };

        let final_label = self.fusion.fuse(text_label, image_label);
        debug!(
            %mode,
            rule = %self.fusion.rule(),
            text = ?text_label,
            image = ?image_label,
            %final_label,
            "labels fused"
        );
        Self::record_label("final", final_label);

        Ok(FusionResult {
            text_label,
            image_label,
            final_label,
        })
    }

    /// Keep `input` only if `mode` asks for `modality`.
    fn gate<T>(mode: Mode, modality: Modality, input: Option<T>) -> Option<T> {
        match (mode.includes(modality), input) {
            (true, Some(input)) => Some(input),
            (true, None) => {
                debug!(%mode, %modality, "modality requested but not supplied, skipping");
                None
            }
            (false, _) => None,
        }
    }

    /// Classify a single modality, without fusion.
    pub async fn classify(&self, request: ModalityRequest<'_>) -> Result<Label> {
        let result = match request {
            ModalityRequest::Text(text) => self.text.classify(text).await,
            ModalityRequest::Image(image) => self.image.classify(image).await,
        };
        Self::record_call(request.modality(), &result);
        result
    }

    async fn classify_optional(
        &self,
        request: Option<ModalityRequest<'_>>,
    ) -> Result<Option<Label>> {
        match request {
            Some(request) => self.classify(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Apply the failure policy to one modality's outcome.
    fn settle(&self, modality: Modality, result: Result<Option<Label>>) -> Result<Option<Label>> {
        match (result, self.failure_policy) {
            (Ok(label), _) => Ok(label),
            (Err(e), FailurePolicy::Abort) => Err(e),
            (Err(e), FailurePolicy::Degrade) => {
                warn!(%modality, error = %e, "modality failed, treating as absent");
                Ok(None)
            }
        }
    }

    // ========================================================================
    // Metrics recording
    // ========================================================================

    fn record_run(mode: Mode, start: Instant, result: &Result<FusionResult>) {
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "mode" => mode.as_str(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "mode" => mode.as_str(),
        )
        .record(start.elapsed().as_secs_f64());
    }

    fn record_call(modality: Modality, result: &Result<Label>) {
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::MODALITY_CALLS_TOTAL,
            "modality" => modality.as_str(),
            "status" => status,
        )
        .increment(1);
        if let Ok(label) = result {
            Self::record_label(modality.as_str(), *label);
        }
    }

    fn record_label(modality: &'static str, label: Label) {
        metrics::counter!(telemetry::LABELS_TOTAL,
            "modality" => modality,
            "label" => label.as_str(),
        )
        .increment(1);
    }
}
