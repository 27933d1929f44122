//! Per-modality classifiers.
//!
//! [`ModelClassifier`] is the leaf that talks to the completion provider.
//! [`TextClassifier`] and [`ImageClassifier`] build the modality prompt,
//! invoke it once and normalise the reply into a [`Label`](crate::Label).

mod image;
mod model;
pub mod prompt;
mod text;

pub use image::{ImageClassifier, data_uri, sniff_mime};
pub use model::ModelClassifier;
pub use text::TextClassifier;
