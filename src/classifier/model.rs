//! The leaf classifier: one completion call, raw reply out.

use std::sync::Arc;

use tracing::instrument;

use crate::Result;
use crate::providers::CompletionProvider;
use crate::types::{CompletionOptions, Message, Modality};

/// Wraps a single call to the completion provider.
///
/// Every call is made with a deterministic (zero-temperature) request,
/// whatever temperature the supplied options carried.
#[derive(Clone)]
pub struct ModelClassifier {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
}

impl ModelClassifier {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        Self {
            provider,
            options: options.deterministic(),
        }
    }

    /// Issue exactly one completion call and return the reply untouched.
    #[instrument(name = "model.classify", skip(self, messages), fields(provider = %self.provider.name(), model = %self.options.model))]
    pub async fn invoke(&self, modality: Modality, messages: &[Message]) -> Result<String> {
        self.provider.complete(messages, &self.options).await
    }
}
