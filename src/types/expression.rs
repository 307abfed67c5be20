use std::fmt;

use crate::lex::Token;

/// Which grammar an expression belongs to, and for tuning rules which template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    BooleanImplication,
    TuningOnAdd,
    TuningFromDelete,
    TuningChangeQuantity,
    TuningChangePrice,
}

impl ExpressionKind {
    #[must_use]
    pub fn family(self) -> Family {
        match self {
            ExpressionKind::BooleanImplication => Family::Boolean,
            _ => Family::Tuning,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExpressionKind::BooleanImplication => "boolean_implication",
            ExpressionKind::TuningOnAdd => "tuning_on_add",
            ExpressionKind::TuningFromDelete => "tuning_from_delete",
            ExpressionKind::TuningChangeQuantity => "tuning_change_quantity",
            ExpressionKind::TuningChangePrice => "tuning_change_price",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expression family a caller may insist on when validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Boolean,
    Tuning,
}

/// Structured operands of a tuning directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuningOperands {
    /// `ON <subject> ADD <object>`
    OnAdd { subject: String, object: String },
    /// `FROM <subject> DELETE <object>`
    FromDelete { subject: String, object: String },
    /// `CHANGE QUANTITY OF <item> TO <quantity>`
    ChangeQuantity { item: String, quantity: u32 },
    /// `CHANGE PRICE <delta>`
    ChangePrice { delta: i64 },
}

impl TuningOperands {
    #[must_use]
    pub fn kind(&self) -> ExpressionKind {
        match self {
            TuningOperands::OnAdd { .. } => ExpressionKind::TuningOnAdd,
            TuningOperands::FromDelete { .. } => ExpressionKind::TuningFromDelete,
            TuningOperands::ChangeQuantity { .. } => ExpressionKind::TuningChangeQuantity,
            TuningOperands::ChangePrice { .. } => ExpressionKind::TuningChangePrice,
        }
    }

    /// BOM codes the directive refers to, in source order.
    #[must_use]
    pub fn bom_codes(&self) -> Vec<&str> {
        match self {
            TuningOperands::OnAdd { subject, object }
            | TuningOperands::FromDelete { subject, object } => {
                vec![subject.as_str(), object.as_str()]
            }
            TuningOperands::ChangeQuantity { item, .. } => vec![item.as_str()],
            TuningOperands::ChangePrice { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for TuningOperands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningOperands::OnAdd { subject, object } => write!(f, "ON {subject} ADD {object}"),
            TuningOperands::FromDelete { subject, object } => {
                write!(f, "FROM {subject} DELETE {object}")
            }
            TuningOperands::ChangeQuantity { item, quantity } => {
                write!(f, "CHANGE QUANTITY OF {item} TO {quantity}")
            }
            TuningOperands::ChangePrice { delta } => write!(f, "CHANGE PRICE {delta:+}"),
        }
    }
}

/// Right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Boolean expression over BOM codes, as written.
    Expression(String),
    Tuning(TuningOperands),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Expression(text) => f.write_str(text),
            Effect::Tuning(operands) => write!(f, "{operands}"),
        }
    }
}

/// Proof that an expression passed validation.
///
/// Only [`Validator`](crate::Validator) can produce one, so a
/// [`Rule`](crate::Rule) can never be assembled from unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExpression {
    pub(crate) source: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) kind: ExpressionKind,
    pub(crate) condition: Option<String>,
    pub(crate) effect: Effect,
}

impl ValidatedExpression {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn kind(&self) -> ExpressionKind {
        self.kind
    }

    /// Text left of the implication operator; `None` for a bare tuning directive.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    #[must_use]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    #[must_use]
    pub fn tuning(&self) -> Option<&TuningOperands> {
        match &self.effect {
            Effect::Tuning(operands) => Some(operands),
            Effect::Expression(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_display_in_canonical_form() {
        let op = TuningOperands::ChangePrice { delta: 100 };
        assert_eq!(op.to_string(), "CHANGE PRICE +100");
        let op = TuningOperands::ChangePrice { delta: -7 };
        assert_eq!(op.to_string(), "CHANGE PRICE -7");
        let op = TuningOperands::ChangeQuantity {
            item: "B1".into(),
            quantity: 4,
        };
        assert_eq!(op.to_string(), "CHANGE QUANTITY OF B1 TO 4");
    }

    #[test]
    fn operand_kinds_and_codes() {
        let op = TuningOperands::OnAdd {
            subject: "B100".into(),
            object: "B200".into(),
        };
        assert_eq!(op.kind(), ExpressionKind::TuningOnAdd);
        assert_eq!(op.kind().family(), Family::Tuning);
        assert_eq!(op.bom_codes(), vec!["B100", "B200"]);
        assert!(TuningOperands::ChangePrice { delta: 1 }.bom_codes().is_empty());
    }

    #[test]
    fn boolean_family() {
        assert_eq!(ExpressionKind::BooleanImplication.family(), Family::Boolean);
        assert_eq!(
            ExpressionKind::BooleanImplication.to_string(),
            "boolean_implication"
        );
    }
}
