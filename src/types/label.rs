//! Relevance labels.
//!
//! The completion provider is asked to answer with exactly one of two
//! strings. Whatever it actually returns is folded into [`Label`] by
//! [`Label::from_reply`], which never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Binary disaster-relevance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The input carries useful information about a real disaster.
    #[serde(rename = "Informative")]
    Informative,
    /// Anything else, including replies the model was not supposed to give.
    #[serde(rename = "Not Informative")]
    NotInformative,
}

impl Label {
    /// The exact reply text that maps to [`Label::Informative`].
    pub const INFORMATIVE_REPLY: &'static str = "Informative";

    /// Reply text the prompts ask for in the negative case.
    pub const NOT_INFORMATIVE_REPLY: &'static str = "Not Informative";

    /// Normalise a raw model reply.
    ///
    /// Surrounding whitespace is ignored. Only the exact string
    /// `"Informative"` yields [`Label::Informative`]; case variants,
    /// punctuation, explanations and the empty string all fall back to
    /// [`Label::NotInformative`].
    pub fn from_reply(reply: &str) -> Self {
        let trimmed = reply.trim();
        if trimmed == Self::INFORMATIVE_REPLY {
            return Label::Informative;
        }
        if trimmed != Self::NOT_INFORMATIVE_REPLY {
            debug!(reply = trimmed, "unexpected label text, treating as not informative");
        }
        Label::NotInformative
    }

    /// Canonical wire text for this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Informative => Self::INFORMATIVE_REPLY,
            Label::NotInformative => Self::NOT_INFORMATIVE_REPLY,
        }
    }

    pub fn is_informative(&self) -> bool {
        matches!(self, Label::Informative)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_reply_is_informative() {
        assert_eq!(Label::from_reply("Informative"), Label::Informative);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Label::from_reply("  Informative\n"), Label::Informative);
        assert_eq!(
            Label::from_reply("\tNot Informative "),
            Label::NotInformative
        );
    }

    #[test]
    fn anything_else_falls_back() {
        for reply in [
            "",
            "   ",
            "informative",
            "INFORMATIVE",
            "Informative.",
            "\"Informative\"",
            "Label: Informative",
            "Not Informative",
            "I cannot classify this image.",
        ] {
            assert_eq!(
                Label::from_reply(reply),
                Label::NotInformative,
                "reply {reply:?} should fall back"
            );
        }
    }

    #[test]
    fn serializes_to_reply_text() {
        assert_eq!(
            serde_json::to_string(&Label::Informative).unwrap(),
            "\"Informative\""
        );
        assert_eq!(
            serde_json::to_string(&Label::NotInformative).unwrap(),
            "\"Not Informative\""
        );
        assert_eq!(Label::NotInformative.to_string(), "Not Informative");
    }
}
