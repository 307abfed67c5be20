use chrono::{DateTime, Utc};

use super::expression::{Effect, ExpressionKind, TuningOperands};
use super::rule_id::RuleId;
use super::status::Status;

/// A committed logic rule.
///
/// Built only by [`assemble`](crate::assemble) from a
/// [`ValidatedExpression`](super::ValidatedExpression), so the expression of
/// every rule is known to be well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) id: RuleId,
    pub(crate) kind: ExpressionKind,
    pub(crate) expression: String,
    pub(crate) condition: Option<String>,
    pub(crate) effect: Effect,
    pub(crate) status: Status,
    pub(crate) tags: Vec<String>,
    pub(crate) tech_doc_path: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) modified_at: DateTime<Utc>,
}

impl Rule {
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ExpressionKind {
        self.kind
    }

    /// The expression exactly as it was entered.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

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

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn tech_doc_path(&self) -> Option<&str> {
        self.tech_doc_path.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }
}

/// Everything about a rule that is not its expression.
///
/// # Example
///
/// ```
/// use bomlogic::{RuleMetadata, Status};
///
/// let meta = RuleMetadata::new()
///     .status(Status::Testing)
///     .tag("pricing")
///     .tag("pricing")
///     .tag("Pricing")
///     .tech_doc_path("docs/price.pdf");
/// assert_eq!(meta.tag_list(), ["pricing", "Pricing"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMetadata {
    pub(crate) status: Status,
    pub(crate) tags: Vec<String>,
    pub(crate) tech_doc_path: Option<String>,
}

impl RuleMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Add a tag. Exact duplicates are ignored; comparison is case-sensitive.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        push_tag(&mut self.tags, tag.into());
        self
    }

    #[must_use]
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            push_tag(&mut self.tags, tag.into());
        }
        self
    }

    #[must_use]
    pub fn tech_doc_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.tech_doc_path = (!path.trim().is_empty()).then_some(path);
        self
    }

    #[must_use]
    pub fn tag_list(&self) -> &[String] {
        &self.tags
    }
}

fn push_tag(tags: &mut Vec<String>, tag: String) {
    let tag = tag.trim();
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_owned());
    }
}

/// Split a legacy comma-separated tag string.
///
/// ```
/// assert_eq!(bomlogic::split_tags(" a, b ,,a "), ["a", "b"]);
/// ```
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for tag in raw.split(',') {
        push_tag(&mut tags, tag.to_owned());
    }
    tags
}
