//! Grammar validation of logic expressions.
//!
//! A [`Validator`] owns the compiled code patterns and runs the token
//! automaton over a single expression. Validation failures are values:
//! every entry point returns the first violation as a [`ValidationError`]
//! carrying an [`ErrorKind`] and the character position of the offending
//! token.

mod error;
mod scan;
mod tuning;

use tracing::trace;

use crate::config::{ConfigError, ValidatorConfig};
use crate::lex::{Lexer, Token, TokenKind};
use crate::types::{EditState, Effect, Family, ValidatedExpression, Verdict};

use self::scan::{Parsed, Scanner};
pub use self::error::{ErrorKind, ValidationError};

/// Spellings a half-typed trailing word may still grow into.
const KEYWORD_SPELLINGS: [&str; 10] = [
    "AND",
    "OR",
    "NOT",
    "ON",
    "ADD",
    "FROM",
    "DELETE",
    "TO",
    "CHANGE PRICE",
    "CHANGE QUANTITY OF",
];

/// Checks expressions against the rule grammar.
///
/// Immutable after construction, so one instance can be shared across
/// threads.
///
/// # Example
///
/// ```
/// use bomlogic::{ErrorKind, ExpressionKind, Validator};
///
/// let validator = Validator::default();
/// let expr = validator.validate("K001 AND K002 → B100").unwrap();
/// assert_eq!(expr.kind(), ExpressionKind::BooleanImplication);
/// assert_eq!(expr.condition(), Some("K001 AND K002"));
///
/// let err = validator.validate("K001 K002 → B100").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::ConsecutiveCodes);
/// assert_eq!(err.position(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    lexer: Lexer,
    numeric_bom_codes: bool,
    max_tokens: usize,
}

impl Default for Validator {
    fn default() -> Self {
        let config = ValidatorConfig::default();
        Self {
            lexer: Lexer::default(),
            numeric_bom_codes: config.numeric_bom_codes,
            max_tokens: config.max_tokens,
        }
    }
}

impl Validator {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a code pattern does not
    /// compile and [`ConfigError::ZeroTokenLimit`] if `max_tokens` is zero.
    pub fn new(config: ValidatorConfig) -> Result<Self, ConfigError> {
        if config.max_tokens == 0 {
            return Err(ConfigError::ZeroTokenLimit);
        }
        Ok(Self {
            lexer: Lexer::new(&config)?,
            numeric_bom_codes: config.numeric_bom_codes,
            max_tokens: config.max_tokens,
        })
    }

    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Tokenize with this validator's code patterns.
    #[must_use]
    pub fn tokenize(&self, raw: &str) -> Vec<Token> {
        self.lexer.tokenize(raw)
    }

    /// Validate `raw`, detecting whether it is a boolean rule or a tuning
    /// directive.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation.
    pub fn validate(&self, raw: &str) -> Result<ValidatedExpression, ValidationError> {
        self.run(raw, None)
    }

    /// Validate `raw`, insisting on one expression family.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation, or
    /// [`ErrorKind::ExpectedBooleanRule`] / [`ErrorKind::ExpectedTuningRule`]
    /// at the token that showed the expression belongs to the other family.
    pub fn validate_as(
        &self,
        raw: &str,
        family: Family,
    ) -> Result<ValidatedExpression, ValidationError> {
        self.run(raw, Some(family))
    }

    pub fn verdict(&self, raw: &str) -> Verdict {
        match self.validate(raw) {
            Ok(expr) => Verdict::Valid(expr.kind()),
            Err(err) => Verdict::Invalid(err),
        }
    }

    /// Classify text that is still being typed.
    ///
    /// Text that is merely cut short is [`EditState::Incomplete`]: the
    /// error was raised at end of input, or it sits on trailing words that
    /// are still being typed (`K001 AN`, `K001 → CHANGE QUAN`, `ON B`).
    /// Anything already broken is [`EditState::Invalid`].
    pub fn assess(&self, raw: &str) -> EditState {
        let tokens = self.lexer.tokenize(raw);
        match self.check(raw, tokens) {
            Ok(expr) => EditState::Complete(expr.kind()),
            Err((err, _)) if err.is_truncation() => EditState::Incomplete(err),
            Err((err, tokens)) if is_unfinished_tail(&tokens, &err) => {
                EditState::Incomplete(err)
            }
            Err((err, _)) => EditState::Invalid(err),
        }
    }

    fn run(
        &self,
        raw: &str,
        expected: Option<Family>,
    ) -> Result<ValidatedExpression, ValidationError> {
        let tokens = self.lexer.tokenize(raw);
        self.check_as(raw, tokens, expected)
            .map_err(|(err, _)| err)
    }

    fn check(
        &self,
        raw: &str,
        tokens: Vec<Token>,
    ) -> Result<ValidatedExpression, (ValidationError, Vec<Token>)> {
        self.check_as(raw, tokens, None)
    }

    /// On failure the tokens are handed back so callers can inspect the tail.
    fn check_as(
        &self,
        raw: &str,
        tokens: Vec<Token>,
        expected: Option<Family>,
    ) -> Result<ValidatedExpression, (ValidationError, Vec<Token>)> {
        if tokens.len() > self.max_tokens + 1 {
            let err = ValidationError::at_token(
                ErrorKind::TooManyTokens,
                &tokens[self.max_tokens],
                self.max_tokens,
            );
            trace!(tokens = tokens.len() - 1, limit = self.max_tokens, "expression too long");
            return Err((err, tokens));
        }
        let scanned = Scanner {
            tokens: &tokens,
            numeric_bom_codes: self.numeric_bom_codes,
            expected,
        }
        .run();
        match scanned {
            Ok(parsed) => {
                trace!(kind = %parsed.kind, tokens = tokens.len() - 1, "expression accepted");
                Ok(build(raw, tokens, parsed))
            }
            Err(err) => {
                trace!(
                    error = %err.kind(),
                    position = err.position(),
                    truncated = err.is_truncation(),
                    "expression rejected"
                );
                Err((err, tokens))
            }
        }
    }
}

fn build(raw: &str, tokens: Vec<Token>, parsed: Parsed) -> ValidatedExpression {
    let implies = parsed.implies_index.map(|i| tokens[i].span());
    let condition = implies
        .as_ref()
        .map(|span| raw[..span.start].trim().to_owned());
    let effect = match parsed.tuning {
        Some(operands) => Effect::Tuning(operands),
        None => {
            let start = implies.map_or(0, |span| span.end);
            Effect::Expression(raw[start..].trim().to_owned())
        }
    };
    ValidatedExpression {
        source: raw.to_owned(),
        tokens,
        kind: parsed.kind,
        condition,
        effect,
    }
}

/// The error sits on the last words of the input and those words are
/// still being typed: the start of a keyword, a lone sign where a price
/// delta belongs, or a half-written code right at the end of the text.
///
/// A keyword that is already spelled out in full cannot grow into anything
/// else, so an error raised on it stands.
fn is_unfinished_tail(tokens: &[Token], err: &ValidationError) -> bool {
    let Some((end, body)) = tokens.split_last() else {
        return false;
    };
    let Some(tail) = body.get(err.token_index()..).filter(|t| !t.is_empty()) else {
        return false;
    };
    let words: Vec<&str> = tail
        .iter()
        .flat_map(|t| t.lexeme().split_whitespace())
        .collect();
    let typed = words.join(" ").to_ascii_uppercase();
    if KEYWORD_SPELLINGS
        .iter()
        .any(|spelling| spelling.len() > typed.len() && spelling.starts_with(&typed))
    {
        return true;
    }
    match tail {
        [sign] if err.kind() == ErrorKind::InvalidPriceFormat => {
            matches!(sign.lexeme(), "+" | "-")
        }
        [word] => {
            word.kind() == TokenKind::Invalid
                && word.span().end == end.span().start
                && word
                    .lexeme()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpressionKind, TuningOperands};

    #[test]
    fn boolean_split() {
        let v = Validator::default();
        let expr = v.validate("  (K001 OR K002) AND NOT K003 -> B100 OR PL-X  ").unwrap();
        assert_eq!(expr.condition(), Some("(K001 OR K002) AND NOT K003"));
        assert_eq!(expr.effect(), &Effect::Expression("B100 OR PL-X".into()));
        assert!(expr.tuning().is_none());
    }

    #[test]
    fn bare_tuning_has_no_condition() {
        let v = Validator::default();
        let expr = v.validate("ON B100 ADD B200").unwrap();
        assert_eq!(expr.kind(), ExpressionKind::TuningOnAdd);
        assert_eq!(expr.condition(), None);
        assert_eq!(
            expr.tuning(),
            Some(&TuningOperands::OnAdd {
                subject: "B100".into(),
                object: "B200".into()
            })
        );
    }

    #[test]
    fn conditional_tuning_keeps_condition() {
        let v = Validator::default();
        let expr = v.validate("K001 AND NOT K002 → CHANGE PRICE +5").unwrap();
        assert_eq!(expr.kind(), ExpressionKind::TuningChangePrice);
        assert_eq!(expr.condition(), Some("K001 AND NOT K002"));
        assert_eq!(expr.effect().to_string(), "CHANGE PRICE +5");
    }

    #[test]
    fn family_mismatch() {
        let v = Validator::default();
        let err = v.validate_as("ON B1 ADD B2", Family::Boolean).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedBooleanRule);
        assert_eq!(err.position(), 0);
        assert!(v.validate_as("K1 → B2", Family::Boolean).is_ok());
        assert!(v.validate_as("K1 → FROM B1 DELETE B2", Family::Tuning).is_ok());
        let err = v.validate_as("K1 → B2", Family::Tuning).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedTuningRule);
    }

    #[test]
    fn token_limit() {
        let v = Validator::new(ValidatorConfig::default().max_tokens(3)).unwrap();
        assert!(v.validate("K1 → B1").is_ok());
        let err = v.validate("K1 → B1 OR B2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyTokens);
        assert_eq!(err.token_index(), 3);
        assert_eq!(err.position(), 8);
        assert!(matches!(
            Validator::new(ValidatorConfig::default().max_tokens(0)),
            Err(ConfigError::ZeroTokenLimit)
        ));
    }

    #[test]
    fn verdicts() {
        let v = Validator::default();
        assert_eq!(
            v.verdict("CHANGE PRICE -3"),
            Verdict::Valid(ExpressionKind::TuningChangePrice)
        );
        assert!(!v.verdict("K1 AND").is_valid());
    }

    #[test]
    fn assess_partial_input() {
        let v = Validator::default();
        let incomplete = [
            "",
            "K001",
            "K001 AND",
            "K001 AND (K002",
            "K001 →",
            "ON B1",
            "ON B1 AD",
            "K1 → CHANGE",
            "K1 → CHANGE QUANT",
            "CHANGE PRICE",
            "CHANGE PRICE +",
            "K1 AN",
            "K",
            "K001 → B",
            "CHANGE QUANTITY OF PL-",
        ];
        for raw in incomplete {
            assert!(
                matches!(v.assess(raw), EditState::Incomplete(_)),
                "{raw:?} should be incomplete"
            );
        }
        for raw in ["K001 K002", "→ B1", "K1 → B1 AND X?", "ON B1 AD B2"] {
            assert!(
                matches!(v.assess(raw), EditState::Invalid(_)),
                "{raw:?} should be invalid"
            );
        }
        assert_eq!(
            v.assess("K1 → CHANGE QUANTITY OF B1 TO 3"),
            EditState::Complete(ExpressionKind::TuningChangeQuantity)
        );
    }

    #[test]
    fn assess_misplaced_whole_keyword_is_invalid() {
        let v = Validator::default();
        let cases = [
            ("K1 AND AND", ErrorKind::ConsecutiveOperators),
            ("K1 NOT", ErrorKind::NotAfterCode),
            ("ADD", ErrorKind::InvalidFirstToken),
            ("ON B1 ADD B2 ON", ErrorKind::MultipleTuningLogic),
            ("K1 → B1 TO", ErrorKind::MisplacedTuningKeyword),
            ("K1 and or", ErrorKind::ConsecutiveOperators),
        ];
        for (raw, kind) in cases {
            match v.assess(raw) {
                EditState::Invalid(err) => assert_eq!(err.kind(), kind, "{raw:?}"),
                other => panic!("{raw:?} should be invalid, got {other:?}"),
            }
        }
        // Half-typed keywords in the same places are still being typed.
        for raw in ["K1 AND AN", "K1 NO", "AD", "ON B1 ADD B2 O", "K1 → B1 T"] {
            assert!(
                matches!(v.assess(raw), EditState::Incomplete(_)),
                "{raw:?} should be incomplete"
            );
        }
        assert_eq!(
            v.assess("K1 → B1"),
            EditState::Complete(ExpressionKind::BooleanImplication)
        );
    }
}
