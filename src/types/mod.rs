//! Public types for the triage API.

mod label;
mod message;
mod options;
mod request;
mod result;

pub use label::Label;
pub use message::{ContentPart, ImageUrl, Message, MessageContent, Role};
pub use options::{CompletionOptions, DEFAULT_MODEL};
pub use request::{Modality, ModalityRequest, Mode};
pub use result::FusionResult;
