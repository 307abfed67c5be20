mod collection;
mod error;
mod expression;
mod rule;
mod rule_id;
mod status;
mod verdict;

pub use collection::RuleCollection;
pub use error::CollectionError;
pub use expression::{Effect, ExpressionKind, Family, TuningOperands, ValidatedExpression};
pub use rule::{split_tags, Rule, RuleMetadata};
pub use rule_id::{ParseRuleIdError, RuleId, RulePrefix};
pub use status::{ParseStatusError, Status};
pub use verdict::{EditState, Verdict};
