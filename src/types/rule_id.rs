use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::expression::{ExpressionKind, Family};

/// Id prefix, one sequence per expression family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RulePrefix {
    /// `BL`
    Boolean,
    /// `TL`
    Tuning,
}

impl RulePrefix {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RulePrefix::Boolean => "BL",
            RulePrefix::Tuning => "TL",
        }
    }

    #[must_use]
    pub fn for_kind(kind: ExpressionKind) -> Self {
        match kind.family() {
            Family::Boolean => RulePrefix::Boolean,
            Family::Tuning => RulePrefix::Tuning,
        }
    }
}

impl fmt::Display for RulePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule identifier such as `BL01` or `TL12`.
///
/// Ordering is by prefix, then by number, so `BL9 < BL10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId {
    prefix: RulePrefix,
    number: u32,
}

impl RuleId {
    #[must_use]
    pub fn new(prefix: RulePrefix, number: u32) -> Self {
        Self { prefix, number }
    }

    #[must_use]
    pub fn prefix(self) -> RulePrefix {
        self.prefix
    }

    #[must_use]
    pub fn number(self) -> u32 {
        self.number
    }

    /// One past the highest number already used under `prefix`, or `None`
    /// once that number is `u32::MAX`.
    ///
    /// Gaps left by deleted rules are never filled.
    ///
    /// ```
    /// use bomlogic::{RuleId, RulePrefix};
    ///
    /// let ids: Vec<RuleId> = ["BL01", "BL02", "BL04", "TL07"]
    ///     .iter()
    ///     .map(|s| s.parse().unwrap())
    ///     .collect();
    /// assert_eq!(RuleId::next(RulePrefix::Boolean, &ids).unwrap().to_string(), "BL05");
    /// assert_eq!(RuleId::next(RulePrefix::Tuning, &ids).unwrap().to_string(), "TL08");
    /// ```
    #[must_use]
    pub fn next<'a>(
        prefix: RulePrefix,
        existing: impl IntoIterator<Item = &'a RuleId>,
    ) -> Option<Self> {
        let highest = existing
            .into_iter()
            .filter(|id| id.prefix == prefix)
            .map(|id| id.number)
            .max()
            .unwrap_or(0);
        highest.checked_add(1).map(|number| Self::new(prefix, number))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.prefix, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a rule id (expected BL or TL followed by digits)")]
pub struct ParseRuleIdError {
    input: String,
}

/// Parses `BL`/`TL` followed by decimal digits.
///
/// The number is stored, not its spelling: `BL007` parses to the same id as
/// `BL07` and is written back as `BL07`.
///
/// ```
/// use bomlogic::RuleId;
///
/// let id: RuleId = "TL007".parse().unwrap();
/// assert_eq!(id.to_string(), "TL07");
/// assert_eq!(id, "TL7".parse().unwrap());
/// ```
impl FromStr for RuleId {
    type Err = ParseRuleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRuleIdError {
            input: s.to_owned(),
        };
        let prefix = match s.get(..2) {
            Some("BL") => RulePrefix::Boolean,
            Some("TL") => RulePrefix::Tuning,
            _ => return Err(err()),
        };
        let digits = &s[2..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let number = digits.parse().map_err(|_| err())?;
        Ok(Self::new(prefix, number))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RuleId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
