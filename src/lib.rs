//! Validation and tuning-rule parsing for bill-of-materials configuration
//! logic.
//!
//! Rules link configuration choices (K-codes such as `K001` or
//! `K-200-000017`) to bill-of-materials entries (BOM codes such as `B100`
//! or `PL-AX-12`):
//!
//! ```text
//! (K001 OR K002) AND NOT K003 → B100 OR B200     boolean implication
//! ON B100 ADD B200                                tuning directive
//! K001 → CHANGE PRICE +50                         conditional tuning
//! ```
//!
//! A [`Validator`] checks an expression left to right and stops at the
//! first violation, reporting an [`ErrorKind`] and the character position of
//! the offending token. It also classifies text that is still being typed
//! with [`Validator::assess`]. Validated expressions are turned into
//! [`Rule`]s and kept in a [`RuleCollection`], which hands out `BL`/`TL` ids.
//!
//! ```
//! use bomlogic::{RuleCollection, RuleMetadata, Status, Validator};
//!
//! let validator = Validator::default();
//! let mut rules = RuleCollection::new();
//!
//! let expr = validator.validate("K001 AND NOT K002 → B100").unwrap();
//! let rule = rules.commit(expr, RuleMetadata::new().status(Status::Testing)).unwrap();
//! assert_eq!(rule.id().to_string(), "BL01");
//! assert_eq!(rule.condition(), Some("K001 AND NOT K002"));
//! ```

mod assemble;
pub mod config;
mod error;
pub mod lex;
pub mod messages;
#[cfg(feature = "serde")]
pub mod serial;
mod types;
mod validate;

pub use assemble::assemble;
pub use config::{ConfigError, ValidatorConfig};
pub use error::BomLogicError;
pub use messages::{EnglishCatalog, MessageCatalog};
pub use types::{
    split_tags, CollectionError, EditState, Effect, ExpressionKind, Family, ParseRuleIdError,
    ParseStatusError, Rule, RuleCollection, RuleId, RuleMetadata, RulePrefix, Status,
    TuningOperands, ValidatedExpression, Verdict,
};
pub use validate::{ErrorKind, ValidationError, Validator};
