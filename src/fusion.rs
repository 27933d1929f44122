//! Late fusion of per-modality labels.
//!
//! Two incompatible rules exist in deployed variants of this classifier:
//! OR (either channel is enough) and AND (both channels must agree). They
//! trade recall against precision, so the rule is configuration rather than
//! a hard-coded choice. OR is the default: in disaster triage a missed
//! report costs more than a false alarm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Label;
use crate::{Result, TriageError};

/// How two optional modality labels combine into one verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionRule {
    /// `Informative` if any supplied label is `Informative`.
    #[default]
    Or,
    /// `Informative` only if both labels are supplied and `Informative`.
    And,
}

impl FusionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionRule::Or => "or",
            FusionRule::And => "and",
        }
    }
}

impl fmt::Display for FusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionRule {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "or" => Ok(FusionRule::Or),
            "and" => Ok(FusionRule::And),
            other => Err(TriageError::Configuration(format!(
                "unknown fusion rule '{other}', expected 'or' or 'and'"
            ))),
        }
    }
}

/// Pure combiner for modality labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FusionEngine {
    rule: FusionRule,
}

impl FusionEngine {
    pub fn new(rule: FusionRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> FusionRule {
        self.rule
    }

    /// Combine the labels. An absent label never counts as `Informative`.
    pub fn fuse(&self, text: Option<Label>, image: Option<Label>) -> Label {
        let informative = |label: Option<Label>| label.is_some_and(|l| l.is_informative());

        let fused = match self.rule {
            FusionRule::Or => informative(text) || informative(image),
            FusionRule::And => informative(text) && informative(image),
        };

        if fused {
            Label::Informative
        } else {
            Label::NotInformative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: Option<Label> = Some(Label::Informative);
    const N: Option<Label> = Some(Label::NotInformative);
    const ABSENT: Option<Label> = None;

    #[test]
    fn default_rule_is_or() {
        assert_eq!(FusionEngine::default().rule(), FusionRule::Or);
    }

    #[test]
    fn or_absent_does_not_block_positive() {
        let engine = FusionEngine::new(FusionRule::Or);
        assert_eq!(engine.fuse(I, ABSENT), Label::Informative);
        assert_eq!(engine.fuse(ABSENT, I), Label::Informative);
        assert_eq!(engine.fuse(ABSENT, ABSENT), Label::NotInformative);
    }

    #[test]
    fn and_needs_both_present() {
        let engine = FusionEngine::new(FusionRule::And);
        assert_eq!(engine.fuse(I, I), Label::Informative);
        assert_eq!(engine.fuse(I, ABSENT), Label::NotInformative);
        assert_eq!(engine.fuse(I, N), Label::NotInformative);
        assert_eq!(engine.fuse(ABSENT, ABSENT), Label::NotInformative);
    }

    #[test]
    fn rule_parses() {
        assert_eq!("OR".parse::<FusionRule>().unwrap(), FusionRule::Or);
        assert_eq!("and".parse::<FusionRule>().unwrap(), FusionRule::And);
        assert!("xor".parse::<FusionRule>().is_err());
    }
}
