use thiserror::Error;

use crate::config::ConfigError;
use crate::types::CollectionError;
use crate::validate::ValidationError;

/// Unified error type for callers that drive the whole pipeline.
///
/// Each component returns its own error; this enum lets them be combined
/// with `?`.
#[derive(Debug, Error)]
pub enum BomLogicError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Import(#[from] crate::serial::ImportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleId, RulePrefix, Validator};

    fn first_error() -> Result<(), BomLogicError> {
        let validator = Validator::default();
        validator.validate("K1 →")?;
        Ok(())
    }

    #[test]
    fn question_mark_converts() {
        let err = first_error().unwrap_err();
        assert!(matches!(err, BomLogicError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "nothing follows the implication operator at position 4"
        );
    }

    #[test]
    fn collection_errors_are_transparent() {
        let err: BomLogicError = CollectionError::UnknownRule {
            id: RuleId::new(RulePrefix::Boolean, 1),
        }
        .into();
        assert_eq!(err.to_string(), "no rule with id 'BL01'");
    }
}
