//! disaster-triage - multimodal disaster-relevance classification
//!
//! Takes a sentence, an image, or both, asks a completion model whether
//! each one is *Informative* about a real disaster, and combines the
//! per-modality answers into one verdict (late fusion).
//!
//! The crate owns prompt construction, request fan-out and the fusion rule.
//! The model itself sits behind the [`CompletionProvider`] trait.
//!
//! # Example
//!
//! ```rust,no_run
//! use disaster_triage::{ClassificationPipeline, Label, Mode};
//!
//! #[tokio::main]
//! async fn main() -> disaster_triage::Result<()> {
//!     let pipeline = ClassificationPipeline::builder()
//!         .openai("sk-your-key")
//!         .build()?;
//!
//!     let result = pipeline
//!         .run(Mode::Both, Some("A building collapsed after the earthquake"), None)
//!         .await?;
//!
//!     if result.final_label == Label::Informative {
//!         println!("forward to responders");
//!     }
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod fusion;
pub mod pipeline;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{ErrorKind, Result, TriageError};
pub use fusion::{FusionEngine, FusionRule};
pub use pipeline::{ClassificationPipeline, Dispatch, FailurePolicy, PipelineBuilder};
pub use providers::CompletionProvider;
pub use version::{PKG_VERSION, version_string};

pub use types::{
    CompletionOptions, ContentPart, FusionResult, ImageUrl, Label, Message, MessageContent,
    Modality, ModalityRequest, Mode, Role,
};
