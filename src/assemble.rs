//! Turning a validated expression into a rule.

use chrono::Utc;

use crate::types::{CollectionError, Rule, RuleId, RuleMetadata, RulePrefix, ValidatedExpression};

/// Build a [`Rule`] with the next free id for the expression's family.
///
/// `existing` is every id already in use; the new number is one past the
/// highest of the matching prefix.
///
/// # Errors
///
/// Returns [`CollectionError::IdSpaceExhausted`] if that highest number is
/// already `u32::MAX`.
///
/// # Example
///
/// ```
/// use bomlogic::{assemble, RuleId, RuleMetadata, Validator};
///
/// let expr = Validator::default().validate("K001 → B100").unwrap();
/// let taken: Vec<RuleId> = vec!["BL01".parse().unwrap(), "BL04".parse().unwrap()];
/// let rule = assemble(expr, RuleMetadata::new(), &taken).unwrap();
/// assert_eq!(rule.id().to_string(), "BL05");
/// ```
pub fn assemble<'a>(
    expr: ValidatedExpression,
    meta: RuleMetadata,
    existing: impl IntoIterator<Item = &'a RuleId>,
) -> Result<Rule, CollectionError> {
    let prefix = RulePrefix::for_kind(expr.kind);
    let id = RuleId::next(prefix, existing).ok_or(CollectionError::IdSpaceExhausted { prefix })?;
    Ok(assemble_with_id(id, expr, meta))
}

/// Build a [`Rule`] under a caller-chosen id. The caller guarantees the
/// prefix matches the expression's family.
pub(crate) fn assemble_with_id(id: RuleId, expr: ValidatedExpression, meta: RuleMetadata) -> Rule {
    let now = Utc::now();
    Rule {
        id,
        kind: expr.kind,
        expression: expr.source,
        condition: expr.condition,
        effect: expr.effect,
        status: meta.status,
        tags: meta.tags,
        tech_doc_path: meta.tech_doc_path,
        created_at: now,
        modified_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Effect, ExpressionKind, Status};
    use crate::Validator;

    #[test]
    fn boolean_rule() {
        let expr = Validator::default().validate("K1 AND K2 → B1").unwrap();
        let none: [RuleId; 0] = [];
        let rule = assemble(expr, RuleMetadata::new().tag("x"), &none).unwrap();
        assert_eq!(rule.id().to_string(), "BL01");
        assert_eq!(rule.kind(), ExpressionKind::BooleanImplication);
        assert_eq!(rule.condition(), Some("K1 AND K2"));
        assert_eq!(rule.effect(), &Effect::Expression("B1".into()));
        assert_eq!(rule.status(), Status::Enabled);
        assert_eq!(rule.tags(), ["x"]);
        assert_eq!(rule.created_at(), rule.modified_at());
    }

    #[test]
    fn tuning_rule_ignores_boolean_ids() {
        let expr = Validator::default().validate("ON B1 ADD B2").unwrap();
        let taken = [RuleId::new(RulePrefix::Boolean, 9)];
        let rule = assemble(expr, RuleMetadata::new(), &taken).unwrap();
        assert_eq!(rule.id().to_string(), "TL01");
        assert_eq!(rule.expression(), "ON B1 ADD B2");
    }

    #[test]
    fn exhausted_prefix_is_an_error() {
        let expr = Validator::default().validate("K1 → B1").unwrap();
        let taken = [RuleId::new(RulePrefix::Boolean, u32::MAX)];
        assert_eq!(
            assemble(expr, RuleMetadata::new(), &taken),
            Err(CollectionError::IdSpaceExhausted {
                prefix: RulePrefix::Boolean
            })
        );
    }
}
