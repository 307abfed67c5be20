//! Left-to-right automaton over token categories.
//!
//! The state is the category of the last significant token, the stack of
//! open parentheses, and where the implication operator was seen. The scan
//! stops at the first violation.

use super::error::{ErrorKind, ValidationError};
use super::tuning;
use crate::lex::{Token, TokenKind};
use crate::types::{ExpressionKind, Family, TuningOperands};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    K,
    Bom,
    AndOr,
    Not,
    LParen,
    RParen,
    Implies,
}

/// Shape of an accepted expression.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub(crate) kind: ExpressionKind,
    /// Token index of the implication operator, if any.
    pub(crate) implies_index: Option<usize>,
    pub(crate) tuning: Option<TuningOperands>,
}

pub(crate) struct Scanner<'t> {
    pub(crate) tokens: &'t [Token],
    pub(crate) numeric_bom_codes: bool,
    pub(crate) expected: Option<Family>,
}

impl Scanner<'_> {
    pub(crate) fn run(&self) -> Result<Parsed, ValidationError> {
        let Some((end, body)) = self.tokens.split_last() else {
            return Err(ValidationError::at_end(ErrorKind::EmptyExpression, 0, 0));
        };
        let mut state = State::default();
        for (index, token) in body.iter().enumerate() {
            if token.kind().is_tuning_keyword() {
                return self.tuning(&state, index);
            }
            if self.expected == Some(Family::Tuning) && state.last == Some(Category::Implies) {
                return Err(ValidationError::at_token(
                    ErrorKind::ExpectedTuningRule,
                    token,
                    index,
                ));
            }
            let category = self.categorize(token, index)?;
            state.step(category, token, index)?;
        }
        state.finish(end, body.len())?;
        Ok(Parsed {
            kind: ExpressionKind::BooleanImplication,
            implies_index: state.implies_at,
            tuning: None,
        })
    }

    /// A tuning construct may open the expression or follow the implication
    /// operator directly.
    fn tuning(&self, state: &State, index: usize) -> Result<Parsed, ValidationError> {
        let token = &self.tokens[index];
        let misplaced = match state.last {
            None if !token.kind().opens_tuning() => Some(ErrorKind::InvalidFirstToken),
            None | Some(Category::Implies) if token.kind().opens_tuning() => None,
            _ => Some(ErrorKind::MisplacedTuningKeyword),
        };
        if let Some(kind) = misplaced {
            return Err(ValidationError::at_token(kind, token, index));
        }
        if self.expected == Some(Family::Boolean) {
            return Err(ValidationError::at_token(
                ErrorKind::ExpectedBooleanRule,
                token,
                index,
            ));
        }
        let (operands, next) = tuning::parse(self.tokens, index, self.numeric_bom_codes)?;
        tuning::check_trailing(self.tokens, next)?;
        Ok(Parsed {
            kind: operands.kind(),
            implies_index: state.implies_at,
            tuning: Some(operands),
        })
    }

    fn categorize(&self, token: &Token, index: usize) -> Result<Category, ValidationError> {
        let category = match token.kind() {
            TokenKind::KCode => Category::K,
            TokenKind::BomCode => Category::Bom,
            TokenKind::Number if self.numeric_bom_codes => Category::Bom,
            TokenKind::And | TokenKind::Or => Category::AndOr,
            TokenKind::Not => Category::Not,
            TokenKind::LParen => Category::LParen,
            TokenKind::RParen => Category::RParen,
            TokenKind::Implies => Category::Implies,
            TokenKind::Number | TokenKind::PriceDelta => {
                return Err(ValidationError::at_token(
                    ErrorKind::UnexpectedLiteral,
                    token,
                    index,
                ))
            }
            TokenKind::Invalid => {
                return Err(ValidationError::at_token(invalid_word(token), token, index))
            }
            _ => {
                return Err(ValidationError::at_token(
                    ErrorKind::MisplacedTuningKeyword,
                    token,
                    index,
                ))
            }
        };
        Ok(category)
    }
}

/// `CHANGE` and `CHANGE QUANTITY` are keywords cut short; anything else is noise.
fn invalid_word(token: &Token) -> ErrorKind {
    let words: Vec<&str> = token.lexeme().split_whitespace().collect();
    let is_change_prefix = match words.as_slice() {
        [change] => change.eq_ignore_ascii_case("CHANGE"),
        [change, quantity] => {
            change.eq_ignore_ascii_case("CHANGE") && quantity.eq_ignore_ascii_case("QUANTITY")
        }
        _ => false,
    };
    if is_change_prefix {
        ErrorKind::IncompleteKeyword
    } else {
        ErrorKind::InvalidToken
    }
}

#[derive(Debug, Default)]
struct State {
    /// `None` at the start of input.
    last: Option<Category>,
    /// Position and token index of every unclosed `(`.
    open: Vec<(usize, usize)>,
    implies_at: Option<usize>,
}

impl State {
    fn step(&mut self, next: Category, token: &Token, index: usize) -> Result<(), ValidationError> {
        self.transition(next)
            .map_err(|kind| ValidationError::at_token(kind, token, index))?;
        match next {
            Category::LParen => self.open.push((token.position(), index)),
            Category::RParen => {
                self.open.pop();
            }
            Category::Implies => self.implies_at = Some(index),
            _ => {}
        }
        self.last = Some(next);
        Ok(())
    }

    fn transition(&self, next: Category) -> Result<(), ErrorKind> {
        use Category::{AndOr, Bom, Implies, LParen, Not, RParen, K};

        let effect_side = self.implies_at.is_some();
        let nested = !self.open.is_empty();
        match (self.last, next) {
            // codes
            (Some(K | Bom), K | Bom) => Err(ErrorKind::ConsecutiveCodes),
            (Some(RParen), K | Bom) => Err(ErrorKind::CodeAfterClosingParenthesis),
            (None, Bom) => Err(ErrorKind::MustStartWithK),
            (Some(Implies), K) => Err(ErrorKind::KAfterImplication),
            (Some(Implies), Bom) => Ok(()),
            (None | Some(AndOr | Not | LParen), K) if effect_side => {
                Err(ErrorKind::KAfterImplication)
            }
            (None | Some(AndOr | Not | LParen), K) => Ok(()),
            (Some(AndOr | Not | LParen), Bom) if effect_side => Ok(()),
            (Some(AndOr | Not | LParen), Bom) => Err(ErrorKind::BomBeforeImplication),

            // AND / OR
            (None, AndOr) => Err(ErrorKind::StartsWithOperator),
            (Some(K | Bom | RParen), AndOr) => Ok(()),
            (Some(AndOr), AndOr) => Err(ErrorKind::ConsecutiveOperators),
            (Some(Not), AndOr) => Err(ErrorKind::OperatorAfterNot),
            (Some(LParen), AndOr) => Err(ErrorKind::OperatorAfterOpeningParenthesis),
            (Some(Implies), AndOr) => Err(ErrorKind::OperatorAfterImplication),

            // NOT
            (None | Some(AndOr | LParen | Implies), Not) => Ok(()),
            (Some(Not), Not) => Err(ErrorKind::ConsecutiveNot),
            (Some(K | Bom), Not) => Err(ErrorKind::NotAfterCode),
            (Some(RParen), Not) => Err(ErrorKind::NotAfterClosingParenthesis),

            // (
            (None | Some(AndOr | Not | LParen | Implies), LParen) => Ok(()),
            (Some(K | Bom), LParen) => Err(ErrorKind::ParenthesisAfterCode),
            (Some(RParen), LParen) => Err(ErrorKind::MissingOperatorBetweenGroups),

            // )
            (None | Some(Implies), RParen) => Err(ErrorKind::UnmatchedClosingParenthesis),
            (Some(AndOr | Not), RParen) => Err(ErrorKind::OperatorBeforeClosingParenthesis),
            (Some(LParen), RParen) => Err(ErrorKind::EmptyParentheses),
            (Some(K | Bom | RParen), RParen) if !nested => {
                Err(ErrorKind::UnmatchedClosingParenthesis)
            }
            (Some(K | Bom | RParen), RParen) => Ok(()),

            // →
            (None, Implies) => Err(ErrorKind::MustStartWithK),
            (Some(AndOr | Not), Implies) => Err(ErrorKind::OperatorBeforeImplication),
            (Some(LParen), Implies) => Err(ErrorKind::ImplicationInsideParentheses),
            (Some(Bom | Implies), Implies) => Err(ErrorKind::MultipleImplications),
            (Some(K | RParen), Implies) if effect_side => Err(ErrorKind::MultipleImplications),
            (Some(K | RParen), Implies) if nested => {
                Err(ErrorKind::ImplicationInsideParentheses)
            }
            (Some(K | RParen), Implies) => Ok(()),
        }
    }

    fn finish(&self, end: &Token, index: usize) -> Result<(), ValidationError> {
        let truncated = |kind: ErrorKind| -> Result<(), ValidationError> {
            Err(ValidationError::at_end(kind, end.position(), index))
        };
        match self.last {
            None => truncated(ErrorKind::EmptyExpression),
            Some(Category::AndOr | Category::Not) => truncated(ErrorKind::EndsWithOperator),
            Some(Category::Implies) => truncated(ErrorKind::EmptyEffect),
            Some(Category::K | Category::Bom | Category::LParen | Category::RParen) => {
                if let Some(&(position, open_index)) = self.open.last() {
                    Err(ValidationError::at_end(
                        ErrorKind::UnclosedParenthesis,
                        position,
                        open_index,
                    ))
                } else if self.implies_at.is_none() {
                    truncated(ErrorKind::MissingImplication)
                } else {
                    Ok(())
                }
            }
        }
    }
}
