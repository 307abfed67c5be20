use std::fmt;

use thiserror::Error;

use crate::lex::Token;

macro_rules! error_kinds {
    ($($variant:ident => $key:literal, $text:literal;)+) => {
        /// Every distinguishable way an expression can be malformed.
        ///
        /// Each variant has a stable snake_case [`key`](ErrorKind::key) so
        /// that presentation layers can look up localized text without
        /// depending on the enum itself.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ErrorKind {
            $($variant,)+
        }

        impl ErrorKind {
            /// All variants, in declaration order.
            pub const ALL: &'static [ErrorKind] = &[$(ErrorKind::$variant,)+];

            #[must_use]
            pub fn key(self) -> &'static str {
                match self {
                    $(ErrorKind::$variant => $key,)+
                }
            }

            /// Built-in English description.
            #[must_use]
            pub fn describe(self) -> &'static str {
                match self {
                    $(ErrorKind::$variant => $text,)+
                }
            }

            /// Reverse of [`key`](ErrorKind::key).
            #[must_use]
            pub fn from_key(key: &str) -> Option<ErrorKind> {
                match key {
                    $($key => Some(ErrorKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

error_kinds! {
    // structural
    EmptyExpression => "empty_expression", "the expression is empty";
    UnclosedParenthesis => "unclosed_parenthesis", "an opening parenthesis is never closed";
    UnmatchedClosingParenthesis => "unmatched_closing_parenthesis", "closing parenthesis without a matching opening parenthesis";
    EmptyParentheses => "empty_parentheses", "parentheses must not be empty";
    ImplicationInsideParentheses => "implication_inside_parentheses", "the implication operator cannot appear inside parentheses";
    // sequencing
    MustStartWithK => "must_start_with_k", "the condition must start with a K-code";
    StartsWithOperator => "starts_with_operator", "the expression cannot start with AND/OR";
    InvalidFirstToken => "invalid_first_token", "the expression cannot start with this token";
    ConsecutiveCodes => "consecutive_codes", "codes must be separated by an operator";
    ConsecutiveOperators => "consecutive_operators", "operators cannot follow each other";
    ConsecutiveNot => "consecutive_not", "NOT cannot follow NOT";
    EndsWithOperator => "ends_with_operator", "the expression cannot end with an operator";
    OperatorAfterNot => "operator_after_not", "AND/OR cannot follow NOT";
    OperatorAfterOpeningParenthesis => "operator_after_opening_parenthesis", "AND/OR cannot follow an opening parenthesis";
    OperatorBeforeClosingParenthesis => "operator_before_closing_parenthesis", "an operator cannot precede a closing parenthesis";
    OperatorBeforeImplication => "operator_before_implication", "an operator cannot precede the implication operator";
    OperatorAfterImplication => "operator_after_implication", "AND/OR cannot follow the implication operator";
    NotAfterCode => "not_after_code", "NOT cannot directly follow a code";
    NotAfterClosingParenthesis => "not_after_closing_parenthesis", "NOT cannot directly follow a closing parenthesis";
    ParenthesisAfterCode => "parenthesis_after_code", "an opening parenthesis cannot directly follow a code";
    MissingOperatorBetweenGroups => "missing_operator_between_groups", "parenthesized groups must be joined by an operator";
    CodeAfterClosingParenthesis => "code_after_closing_parenthesis", "a code cannot directly follow a closing parenthesis";
    // context
    BomBeforeImplication => "bom_before_implication", "BOM codes are only allowed after the implication operator";
    KAfterImplication => "k_after_implication", "K-codes are only allowed before the implication operator";
    MultipleImplications => "multiple_implications", "only one implication operator is allowed";
    MissingImplication => "missing_implication", "the rule needs an implication operator";
    EmptyEffect => "empty_effect", "nothing follows the implication operator";
    MisplacedTuningKeyword => "misplaced_tuning_keyword", "tuning keywords are not allowed here";
    MultipleTuningLogic => "multiple_tuning_logic", "only one tuning directive is allowed per rule";
    ImplicationAfterTuning => "implication_after_tuning", "the implication operator cannot follow a tuning directive";
    UnexpectedTokenAfterTuning => "unexpected_token_after_tuning", "nothing may follow a complete tuning directive";
    ExpectedBooleanRule => "expected_boolean_rule", "a boolean rule was expected, not a tuning directive";
    ExpectedTuningRule => "expected_tuning_rule", "a tuning directive was expected after the implication operator";
    // lexical
    InvalidToken => "invalid_token", "unrecognized token";
    IncompleteKeyword => "incomplete_keyword", "incomplete keyword";
    UnexpectedLiteral => "unexpected_literal", "numbers and price deltas are only allowed in tuning directives";
    TooManyTokens => "too_many_tokens", "the expression is too long";
    // operand format
    ExpectedBomCode => "expected_bom_code", "a BOM code is expected here";
    MissingAddKeyword => "missing_add_keyword", "ADD is expected here";
    MissingDeleteKeyword => "missing_delete_keyword", "DELETE is expected here";
    MissingToKeyword => "missing_to_keyword", "TO is expected here";
    InvalidQuantity => "invalid_quantity", "the quantity must be a non-negative whole number";
    InvalidPriceFormat => "invalid_price_format", "the price change must be a number starting with + or -";
    IncompleteTuningLogic => "incomplete_tuning_logic", "the tuning directive is incomplete";
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The first violation found in an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at position {}", .kind.describe(), .position)]
pub struct ValidationError {
    kind: ErrorKind,
    position: usize,
    token_index: usize,
    at_end: bool,
}

impl ValidationError {
    pub(crate) fn at_token(kind: ErrorKind, token: &Token, token_index: usize) -> Self {
        Self {
            kind,
            position: token.position(),
            token_index,
            at_end: false,
        }
    }

    /// An error discovered only because input ran out.
    pub(crate) fn at_end(kind: ErrorKind, position: usize, token_index: usize) -> Self {
        Self {
            kind,
            position,
            token_index,
            at_end: true,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Character offset of the offending token.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Index of the offending token in the token sequence.
    #[must_use]
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    /// True when the expression is a valid prefix that simply stops too early.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        self.at_end
    }
}
