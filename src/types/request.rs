//! Classification request types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TriageError;

/// Input channel that can yield a relevance judgment on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which modalities a request asks to classify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Text,
    Image,
    #[default]
    Both,
}

impl Mode {
    /// Whether this mode asks for the given modality.
    pub fn includes(&self, modality: Modality) -> bool {
        matches!(
            (self, modality),
            (Mode::Both, _) | (Mode::Text, Modality::Text) | (Mode::Image, Modality::Image)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Image => "image",
            Mode::Both => "both",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Mode::Text),
            "image" => Ok(Mode::Image),
            "both" => Ok(Mode::Both),
            other => Err(TriageError::InvalidInput(format!(
                "unknown mode '{other}', expected one of: text, image, both"
            ))),
        }
    }
}

/// A single modality payload, borrowed from the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalityRequest<'a> {
    Text(&'a str),
    Image(&'a [u8]),
}

impl ModalityRequest<'_> {
    pub fn modality(&self) -> Modality {
        match self {
            ModalityRequest::Text(_) => Modality::Text,
            ModalityRequest::Image(_) => Modality::Image,
        }
    }
}
