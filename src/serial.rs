//! JSON interchange for rule collections.
//!
//! Two shapes are written:
//!
//! ```text
//! export array      [ {id, kind, expression, condition, effect, status,
//!                      tags, tech_doc_path, created_at, modified_at}, ... ]
//! auto-save doc     { "BL_rules": [...], "TL_rules": [...],
//!                     "exported": bool, "saved_at": RFC 3339 }
//! ```
//!
//! Import accepts either shape, plus files from older tools: documents
//! keyed `bl_rules`/`tl_rules` or holding a single `rules` list, and records
//! that use `logic_id`, `selection_expression`, `logic_relation` and
//! `impact_expression` and store tags as one comma-separated string. Every
//! record is revalidated before it is stored; records that fail are skipped
//! and listed in the [`ImportReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::assemble::assemble_with_id;
use crate::types::{
    split_tags, CollectionError, Rule, RuleCollection, RuleId, RuleMetadata, RulePrefix, Status,
};
use crate::validate::{ValidationError, Validator};

const BOOLEAN_KEY: &str = "BL_rules";
const TUNING_KEY: &str = "TL_rules";
/// Accepted spellings per family, preferred first.
const FAMILY_KEYS: [[&str; 2]; 2] = [[BOOLEAN_KEY, "bl_rules"], [TUNING_KEY, "tl_rules"]];
/// Single mixed list written by the oldest tools.
const LEGACY_RULES_KEY: &str = "rules";
const EXPORTED_KEY: &str = "exported";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort an import as a whole.
///
/// Problems with individual records never abort; they are reported in
/// [`ImportReport::skipped`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of rules or an object with BL_rules/TL_rules or rules arrays")]
    UnrecognizedShape,
}

// ---------------------------------------------------------------------------
// Serialized shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SerializedRule<'a> {
    id: RuleId,
    kind: &'static str,
    expression: &'a str,
    condition: Option<&'a str>,
    effect: String,
    status: Status,
    tags: &'a [String],
    tech_doc_path: Option<&'a str>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl<'a> From<&'a Rule> for SerializedRule<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self {
            id: rule.id(),
            kind: rule.kind().as_str(),
            expression: rule.expression(),
            condition: rule.condition(),
            effect: rule.effect().to_string(),
            status: rule.status(),
            tags: rule.tags(),
            tech_doc_path: rule.tech_doc_path(),
            created_at: rule.created_at(),
            modified_at: rule.modified_at(),
        }
    }
}

/// The auto-save document: rules split by family plus export bookkeeping.
#[derive(Debug, Serialize)]
pub struct RuleDocument<'a> {
    #[serde(rename = "BL_rules")]
    boolean: Vec<SerializedRule<'a>>,
    #[serde(rename = "TL_rules")]
    tuning: Vec<SerializedRule<'a>>,
    exported: bool,
    saved_at: DateTime<Utc>,
}

impl RuleDocument<'_> {
    #[must_use]
    pub fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.boolean.len() + self.tuning.len()
    }
}

/// One imported record, current or legacy.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RuleRecord {
    #[serde(alias = "logic_id", alias = "rule_id")]
    id: Option<String>,
    expression: Option<String>,
    #[serde(alias = "selection_expression")]
    condition: Option<String>,
    #[serde(alias = "logic_relation")]
    relation: Option<String>,
    #[serde(alias = "impact_expression", alias = "action")]
    effect: Option<String>,
    status: Option<String>,
    tags: Option<TagsField>,
    tech_doc_path: Option<String>,
    created_at: Option<String>,
    modified_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<String>),
    Joined(String),
}

impl RuleRecord {
    /// The full expression, rebuilt from the split fields when needed.
    fn expression_text(&self) -> Option<String> {
        if let Some(expression) = non_blank(self.expression.as_deref()) {
            return Some(expression.to_owned());
        }
        let effect = non_blank(self.effect.as_deref())?;
        match non_blank(self.condition.as_deref()) {
            Some(condition) => {
                let relation = match non_blank(self.relation.as_deref()) {
                    Some("->") => "->",
                    _ => "→",
                };
                Some(format!("{condition} {relation} {effect}"))
            }
            None => Some(effect.to_owned()),
        }
    }

    fn metadata(&self) -> RuleMetadata {
        let status = match self.status.as_deref().map(str::parse::<Status>) {
            Some(Ok(status)) => status,
            Some(Err(err)) => {
                warn!(%err, "unknown status on imported rule, using Enabled");
                Status::Enabled
            }
            None => Status::Enabled,
        };
        let tags = match &self.tags {
            Some(TagsField::List(list)) => list.clone(),
            Some(TagsField::Joined(joined)) => split_tags(joined),
            None => Vec::new(),
        };
        let meta = RuleMetadata::new().status(status).tags(tags);
        match self.tech_doc_path.as_deref() {
            Some(path) => meta.tech_doc_path(path),
            None => meta,
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn timestamp(text: Option<&str>) -> Option<DateTime<Utc>> {
    let text = text?;
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

// ---------------------------------------------------------------------------
// Import report
// ---------------------------------------------------------------------------

/// What an import did, record by record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of every stored record, in input order.
    pub imported: Vec<RuleId>,
    /// Stored records that replaced an existing rule with the same id.
    pub overwritten: Vec<RuleId>,
    /// Records whose id was missing, malformed or of the wrong family,
    /// with the id they were given.
    pub renumbered: Vec<(Option<String>, RuleId)>,
    pub skipped: Vec<SkippedRecord>,
}

impl ImportReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.overwritten.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input.
    pub index: usize,
    /// The record's id as written, if any.
    pub id: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("record is not a rule object: {0}")]
    Malformed(String),

    #[error("record has no expression")]
    MissingExpression,

    #[error("expression is invalid: {0}")]
    Invalid(ValidationError),

    #[error("record cannot be stored: {0}")]
    Rejected(CollectionError),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// All rules as a JSON array, in collection order.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if a value cannot be represented as JSON.
pub fn export_json(collection: &RuleCollection) -> Result<Value, serde_json::Error> {
    let records: Vec<SerializedRule<'_>> = collection.iter().map(SerializedRule::from).collect();
    let value = serde_json::to_value(records)?;
    info!(rules = collection.len(), "rules exported");
    Ok(value)
}

/// Snapshot of the collection in the auto-save shape.
#[must_use]
pub fn autosave_document(collection: &RuleCollection) -> RuleDocument<'_> {
    RuleDocument {
        boolean: collection
            .with_prefix(RulePrefix::Boolean)
            .map(SerializedRule::from)
            .collect(),
        tuning: collection
            .with_prefix(RulePrefix::Tuning)
            .map(SerializedRule::from)
            .collect(),
        exported: collection.is_exported(),
        saved_at: Utc::now(),
    }
}

/// [`autosave_document`] rendered as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if a value cannot be represented as JSON.
pub fn autosave_json(collection: &RuleCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&autosave_document(collection))
}

/// Revalidate and store every rule found in `json`.
///
/// Records with a missing id, an id that does not parse, or an id whose
/// prefix disagrees with the expression get the next free id. A record whose
/// id is already taken overwrites the existing rule.
///
/// Loading an auto-save document into an empty collection restores its
/// `exported` flag; any other import leaves the collection unexported.
///
/// # Errors
///
/// Returns [`ImportError`] if `json` is not JSON or has neither accepted
/// shape. Nothing is stored in that case.
pub fn import_json(
    json: &str,
    validator: &Validator,
    collection: &mut RuleCollection,
) -> Result<ImportReport, ImportError> {
    let incoming = incoming(serde_json::from_str(json)?)?;
    let was_empty = collection.is_empty();
    let mut report = ImportReport::default();

    for (index, value) in incoming.records.into_iter().enumerate() {
        let record: RuleRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(err) => {
                warn!(index, %err, "skipping malformed rule record");
                report.skipped.push(SkippedRecord {
                    index,
                    id: None,
                    reason: SkipReason::Malformed(err.to_string()),
                });
                continue;
            }
        };
        let skip = |reason: SkipReason| SkippedRecord {
            index,
            id: record.id.clone(),
            reason,
        };

        let Some(text) = record.expression_text() else {
            warn!(index, id = ?record.id, "skipping rule record without expression");
            report.skipped.push(skip(SkipReason::MissingExpression));
            continue;
        };
        let expr = match validator.validate(&text) {
            Ok(expr) => expr,
            Err(err) => {
                warn!(index, id = ?record.id, error = %err.kind(), "skipping invalid rule");
                report.skipped.push(skip(SkipReason::Invalid(err)));
                continue;
            }
        };

        let prefix = RulePrefix::for_kind(expr.kind());
        let id = match record.id.as_deref().map(|s| s.trim().parse::<RuleId>()) {
            Some(Ok(id)) if id.prefix() == prefix => id,
            _ => match collection.next_id(prefix) {
                Some(id) => {
                    report.renumbered.push((record.id.clone(), id));
                    id
                }
                None => {
                    warn!(index, %prefix, "no free id left for imported rule");
                    let err = CollectionError::IdSpaceExhausted { prefix };
                    report.skipped.push(skip(SkipReason::Rejected(err)));
                    continue;
                }
            },
        };

        let mut rule = assemble_with_id(id, expr, record.metadata());
        if let Some(created) = timestamp(record.created_at.as_deref()) {
            rule.created_at = created;
        }
        if let Some(modified) = timestamp(record.modified_at.as_deref()) {
            rule.modified_at = modified;
        }

        if collection.upsert(rule).is_some() {
            warn!(%id, "imported rule overwrote an existing rule");
            report.overwritten.push(id);
        }
        report.imported.push(id);
    }

    if was_empty && incoming.exported == Some(true) {
        collection.mark_exported();
    }

    info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        renumbered = report.renumbered.len(),
        "rules imported"
    );
    Ok(report)
}

/// Rule records found in an import, plus the document's export flag.
#[derive(Debug)]
struct Incoming {
    records: Vec<Value>,
    exported: Option<bool>,
}

fn incoming(root: Value) -> Result<Incoming, ImportError> {
    let mut map = match root {
        Value::Array(records) => {
            return Ok(Incoming {
                records,
                exported: None,
            })
        }
        Value::Object(map) => map,
        _ => return Err(ImportError::UnrecognizedShape),
    };
    let exported = map.get(EXPORTED_KEY).and_then(Value::as_bool);

    let mut records = Vec::new();
    let mut keyed_by_family = false;
    for spellings in FAMILY_KEYS {
        match spellings.iter().find_map(|key| map.remove(*key)) {
            Some(Value::Array(list)) => {
                keyed_by_family = true;
                records.extend(list);
            }
            Some(Value::Null) => keyed_by_family = true,
            Some(_) => return Err(ImportError::UnrecognizedShape),
            None => {}
        }
    }
    if !keyed_by_family {
        match map.remove(LEGACY_RULES_KEY) {
            Some(Value::Array(list)) => records = list,
            _ => return Err(ImportError::UnrecognizedShape),
        }
    }
    Ok(Incoming { records, exported })
}
