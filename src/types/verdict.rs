use std::fmt;

use super::expression::ExpressionKind;
use crate::validate::ValidationError;

/// Outcome of validating a complete expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    Valid(ExpressionKind),
    Invalid(ValidationError),
}

impl Verdict {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    #[must_use]
    pub fn kind(&self) -> Option<ExpressionKind> {
        match self {
            Verdict::Valid(kind) => Some(*kind),
            Verdict::Invalid(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Verdict::Valid(_) => None,
            Verdict::Invalid(err) => Some(err),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid(kind) => write!(f, "valid ({kind})"),
            Verdict::Invalid(err) => write!(f, "invalid: {err}"),
        }
    }
}

/// Outcome of checking an expression that is still being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum EditState {
    /// The text is already a complete, valid expression.
    Complete(ExpressionKind),
    /// Nothing is wrong yet; the text just stops early. Carries the error a
    /// final validation would report.
    Incomplete(ValidationError),
    /// No continuation can make the text valid.
    Invalid(ValidationError),
}

impl EditState {
    /// False only when the text is already broken.
    #[must_use]
    pub fn is_viable(&self) -> bool {
        !matches!(self, EditState::Invalid(_))
    }
}
