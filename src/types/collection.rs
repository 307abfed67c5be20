use chrono::Utc;
use tracing::{debug, info};

use super::error::CollectionError;
use super::expression::ValidatedExpression;
use super::rule::{Rule, RuleMetadata};
use super::rule_id::{RuleId, RulePrefix};
use super::status::Status;
use crate::assemble::{assemble, assemble_with_id};

/// In-memory owner of the rules being edited, in insertion order.
///
/// Ids are unique within a collection. Every mutation marks the collection
/// as not yet exported.
///
/// # Example
///
/// ```
/// use bomlogic::{RuleCollection, RuleMetadata, Validator};
///
/// let validator = Validator::default();
/// let mut rules = RuleCollection::new();
/// let first = rules.commit(validator.validate("K001 → B100").unwrap(), RuleMetadata::new())?;
/// assert_eq!(first.id().to_string(), "BL01");
/// let tuning = rules.commit(validator.validate("ON B1 ADD B2").unwrap(), RuleMetadata::new())?;
/// assert_eq!(tuning.id().to_string(), "TL01");
/// assert!(rules.has_unexported_rules());
/// # Ok::<(), bomlogic::CollectionError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleCollection {
    rules: Vec<Rule>,
    exported: bool,
}

impl RuleCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble `expr` under the next free id and store it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::IdSpaceExhausted`] if the family already
    /// holds the highest possible rule number.
    pub fn commit(
        &mut self,
        expr: ValidatedExpression,
        meta: RuleMetadata,
    ) -> Result<&Rule, CollectionError> {
        let rule = assemble(expr, meta, self.ids())?;
        debug!(id = %rule.id, kind = %rule.kind, "rule committed");
        Ok(self.push(rule))
    }

    /// Store an already assembled rule.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateId`] if the id is taken.
    pub fn insert(&mut self, rule: Rule) -> Result<(), CollectionError> {
        if self.position(rule.id).is_some() {
            return Err(CollectionError::DuplicateId { id: rule.id });
        }
        debug!(id = %rule.id, "rule inserted");
        self.push(rule);
        Ok(())
    }

    /// Store `rule`, overwriting any rule with the same id in place.
    /// Returns the overwritten rule.
    pub fn upsert(&mut self, rule: Rule) -> Option<Rule> {
        self.exported = false;
        match self.position(rule.id) {
            Some(index) => {
                debug!(id = %rule.id, "rule overwritten");
                Some(std::mem::replace(&mut self.rules[index], rule))
            }
            None => {
                debug!(id = %rule.id, "rule inserted");
                self.rules.push(rule);
                None
            }
        }
    }

    /// Replace the expression and metadata of an existing rule.
    ///
    /// The id and creation time are kept; the modification time is bumped.
    ///
    /// # Errors
    ///
    /// [`CollectionError::UnknownRule`] if `id` is not present, and
    /// [`CollectionError::PrefixMismatch`] if `expr` belongs to the other
    /// family.
    pub fn replace(
        &mut self,
        id: RuleId,
        expr: ValidatedExpression,
        meta: RuleMetadata,
    ) -> Result<&Rule, CollectionError> {
        let index = self
            .position(id)
            .ok_or(CollectionError::UnknownRule { id })?;
        let found = RulePrefix::for_kind(expr.kind());
        if found != id.prefix() {
            return Err(CollectionError::PrefixMismatch { id, found });
        }
        let mut rule = assemble_with_id(id, expr, meta);
        rule.created_at = self.rules[index].created_at;
        self.rules[index] = rule;
        self.exported = false;
        debug!(%id, "rule replaced");
        Ok(&self.rules[index])
    }

    /// # Errors
    ///
    /// Returns [`CollectionError::UnknownRule`] if `id` is not present.
    pub fn set_status(&mut self, id: RuleId, status: Status) -> Result<(), CollectionError> {
        let index = self
            .position(id)
            .ok_or(CollectionError::UnknownRule { id })?;
        let rule = &mut self.rules[index];
        rule.status = status;
        rule.modified_at = Utc::now();
        self.exported = false;
        debug!(%id, %status, "rule status changed");
        Ok(())
    }

    pub fn remove(&mut self, id: RuleId) -> Option<Rule> {
        let index = self.position(id)?;
        self.exported = false;
        debug!(%id, "rule removed");
        Some(self.rules.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rules under one prefix, in insertion order.
    pub fn with_prefix(&self, prefix: RulePrefix) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.id.prefix() == prefix)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.rules.iter().map(|r| &r.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The id the next committed rule of this family would get, or `None`
    /// if the family has run out of numbers.
    #[must_use]
    pub fn next_id(&self, prefix: RulePrefix) -> Option<RuleId> {
        RuleId::next(prefix, self.ids())
    }

    pub fn mark_exported(&mut self) {
        self.exported = true;
        info!(rules = self.rules.len(), "rules marked exported");
    }

    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// True when there are rules that changed since the last export.
    #[must_use]
    pub fn has_unexported_rules(&self) -> bool {
        !self.exported && !self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        info!(rules = self.rules.len(), exported = self.exported, "rules cleared");
        self.rules.clear();
        self.exported = false;
    }

    fn position(&self, id: RuleId) -> Option<usize> {
        self.rules.iter().position(|r| r.id == id)
    }

    fn push(&mut self, rule: Rule) -> &Rule {
        self.exported = false;
        let index = self.rules.len();
        self.rules.push(rule);
        &self.rules[index]
    }
}

impl<'a> IntoIterator for &'a RuleCollection {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
