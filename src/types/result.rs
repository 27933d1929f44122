//! Fusion output

use serde::{Deserialize, Serialize};

use super::Label;

/// Per-modality labels plus the fused verdict for one request.
///
/// A modality label is `None` when that modality was not requested, not
/// supplied, or (under the degrade policy) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionResult {
    pub text_label: Option<Label>,
    pub image_label: Option<Label>,
    pub final_label: Label,
}
