//! Text modality.

use tracing::debug;

use super::ModelClassifier;
use super::prompt;
use crate::types::{Label, Modality};
use crate::{Result, TriageError};

/// Classifies a single sentence.
#[derive(Clone)]
pub struct TextClassifier {
    model: ModelClassifier,
}

impl TextClassifier {
    pub fn new(model: ModelClassifier) -> Self {
        Self { model }
    }

    /// Classify `text`, issuing one completion call.
    ///
    /// Blank input is rejected before any call is made.
    pub async fn classify(&self, text: &str) -> Result<Label> {
        if text.trim().is_empty() {
            return Err(TriageError::InvalidInput(
                "text to classify must not be empty".to_string(),
            ));
        }

        let reply = self
            .model
            .invoke(Modality::Text, &prompt::text_messages(text))
            .await?;
        let label = Label::from_reply(&reply);
        debug!(%label, "text classified");
        Ok(label)
    }
}
