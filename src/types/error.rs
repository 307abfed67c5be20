use thiserror::Error;

use super::rule_id::{RuleId, RulePrefix};

/// Errors from mutating a [`RuleCollection`](super::RuleCollection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("a rule with id '{id}' already exists")]
    DuplicateId { id: RuleId },

    #[error("no rule with id '{id}'")]
    UnknownRule { id: RuleId },

    #[error("rule '{id}' cannot hold a {found} expression")]
    PrefixMismatch { id: RuleId, found: RulePrefix },

    #[error("no {prefix} id left: the highest rule number is already taken")]
    IdSpaceExhausted { prefix: RulePrefix },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_message() {
        let err = CollectionError::DuplicateId {
            id: RuleId::new(RulePrefix::Boolean, 3),
        };
        assert_eq!(err.to_string(), "a rule with id 'BL03' already exists");
    }

    #[test]
    fn unknown_rule_message() {
        let err = CollectionError::UnknownRule {
            id: RuleId::new(RulePrefix::Tuning, 1),
        };
        assert_eq!(err.to_string(), "no rule with id 'TL01'");
    }

    #[test]
    fn prefix_mismatch_message() {
        let err = CollectionError::PrefixMismatch {
            id: RuleId::new(RulePrefix::Boolean, 2),
            found: RulePrefix::Tuning,
        };
        assert_eq!(err.to_string(), "rule 'BL02' cannot hold a TL expression");
    }

    #[test]
    fn id_space_exhausted_message() {
        let err = CollectionError::IdSpaceExhausted {
            prefix: RulePrefix::Boolean,
        };
        assert_eq!(
            err.to_string(),
            "no BL id left: the highest rule number is already taken"
        );
    }
}
