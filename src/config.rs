use thiserror::Error;

/// Default shape of a feature-value code: `K001`, `K-200-000017`.
pub const DEFAULT_K_CODE_PATTERN: &str = r"K(-?\d+)+";

/// Default shape of a BOM item or placeholder code: `B100`, `PL-AX-12`.
pub const DEFAULT_BOM_CODE_PATTERN: &str = r"PL-[A-Za-z0-9-]+|B\d+";

/// Default bound on the number of tokens a single expression may contain.
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Settings for a [`Validator`](crate::Validator).
///
/// Passed explicitly at construction; nothing inside the engine reads
/// global state. With the `serde` feature the struct deserializes from any
/// serde format and missing fields fall back to their defaults.
///
/// # Example
///
/// ```
/// use bomlogic::{Validator, ValidatorConfig};
///
/// let config = ValidatorConfig::default()
///     .bom_code_pattern(r"BOM-\d{4}")
///     .numeric_bom_codes(false);
/// let validator = Validator::new(config).unwrap();
/// assert!(validator.validate("K001 → BOM-0001").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ValidatorConfig {
    /// Regular expression a whole word must match to be a K-code.
    pub k_code_pattern: String,
    /// Regular expression a whole word must match to be a BOM code.
    pub bom_code_pattern: String,
    /// Treat bare digit runs (`1139101`) as BOM codes outside quantity slots.
    pub numeric_bom_codes: bool,
    /// Require keywords in upper case. Off by default: `and`, `On`, `change price` all work.
    pub case_sensitive_keywords: bool,
    pub max_tokens: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            k_code_pattern: DEFAULT_K_CODE_PATTERN.to_owned(),
            bom_code_pattern: DEFAULT_BOM_CODE_PATTERN.to_owned(),
            numeric_bom_codes: true,
            case_sensitive_keywords: false,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn k_code_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.k_code_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn bom_code_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.bom_code_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn numeric_bom_codes(mut self, enabled: bool) -> Self {
        self.numeric_bom_codes = enabled;
        self
    }

    #[must_use]
    pub fn case_sensitive_keywords(mut self, enabled: bool) -> Self {
        self.case_sensitive_keywords = enabled;
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }
}

/// Errors produced when a [`ValidatorConfig`] cannot be turned into a validator.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {which} pattern '{pattern}': {source}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("max_tokens must be at least 1")]
    ZeroTokenLimit,
}
