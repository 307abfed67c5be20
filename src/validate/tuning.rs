//! Slot parser for the four tuning templates.
//!
//! ```text
//! ON <bom> ADD <bom>
//! FROM <bom> DELETE <bom>
//! CHANGE QUANTITY OF <bom> TO <quantity>
//! CHANGE PRICE <delta>
//! ```

use super::error::{ErrorKind, ValidationError};
use crate::lex::{Token, TokenKind};
use crate::types::TuningOperands;

/// Parse the tuning construct opened by `tokens[start]`.
///
/// Returns the operands and the index of the first token after the construct.
pub(crate) fn parse(
    tokens: &[Token],
    start: usize,
    numeric_bom_codes: bool,
) -> Result<(TuningOperands, usize), ValidationError> {
    let mut slots = Slots {
        tokens,
        index: start + 1,
        numeric_bom_codes,
    };
    let operands = match tokens[start].kind() {
        TokenKind::On => {
            let subject = slots.bom_code()?;
            slots.keyword(TokenKind::Add, ErrorKind::MissingAddKeyword)?;
            let object = slots.bom_code()?;
            TuningOperands::OnAdd { subject, object }
        }
        TokenKind::From => {
            let subject = slots.bom_code()?;
            slots.keyword(TokenKind::Delete, ErrorKind::MissingDeleteKeyword)?;
            let object = slots.bom_code()?;
            TuningOperands::FromDelete { subject, object }
        }
        TokenKind::ChangeQuantityOf => {
            let item = slots.bom_code()?;
            slots.keyword(TokenKind::To, ErrorKind::MissingToKeyword)?;
            let quantity = slots.quantity()?;
            TuningOperands::ChangeQuantity { item, quantity }
        }
        TokenKind::ChangePrice => TuningOperands::ChangePrice {
            delta: slots.price_delta()?,
        },
        _ => {
            return Err(ValidationError::at_token(
                ErrorKind::MisplacedTuningKeyword,
                &tokens[start],
                start,
            ))
        }
    };
    Ok((operands, slots.index))
}

/// Nothing may follow a complete tuning construct.
pub(crate) fn check_trailing(tokens: &[Token], index: usize) -> Result<(), ValidationError> {
    let token = &tokens[index];
    let kind = match token.kind() {
        TokenKind::End => return Ok(()),
        k if k.is_tuning_keyword() => ErrorKind::MultipleTuningLogic,
        TokenKind::Implies => ErrorKind::ImplicationAfterTuning,
        _ => ErrorKind::UnexpectedTokenAfterTuning,
    };
    Err(ValidationError::at_token(kind, token, index))
}

struct Slots<'t> {
    tokens: &'t [Token],
    index: usize,
    numeric_bom_codes: bool,
}

impl<'t> Slots<'t> {
    /// Take the next token. `End` is never consumed.
    fn next(&mut self) -> (&'t Token, usize) {
        let tokens = self.tokens;
        let index = self.index;
        let token = &tokens[index];
        if token.kind() != TokenKind::End {
            self.index += 1;
        }
        (token, index)
    }

    fn incomplete(token: &Token, index: usize) -> ValidationError {
        ValidationError::at_end(ErrorKind::IncompleteTuningLogic, token.position(), index)
    }

    fn bom_code(&mut self) -> Result<String, ValidationError> {
        let (token, index) = self.next();
        match token.kind() {
            TokenKind::BomCode => Ok(token.lexeme().to_owned()),
            TokenKind::Number if self.numeric_bom_codes => Ok(token.lexeme().to_owned()),
            TokenKind::End => Err(Self::incomplete(token, index)),
            _ => Err(ValidationError::at_token(
                ErrorKind::ExpectedBomCode,
                token,
                index,
            )),
        }
    }

    fn keyword(&mut self, expected: TokenKind, missing: ErrorKind) -> Result<(), ValidationError> {
        let (token, index) = self.next();
        match token.kind() {
            k if k == expected => Ok(()),
            TokenKind::End => Err(Self::incomplete(token, index)),
            _ => Err(ValidationError::at_token(missing, token, index)),
        }
    }

    fn quantity(&mut self) -> Result<u32, ValidationError> {
        let (token, index) = self.next();
        let invalid = || ValidationError::at_token(ErrorKind::InvalidQuantity, token, index);
        match token.kind() {
            TokenKind::Number => token.lexeme().parse().map_err(|_| invalid()),
            TokenKind::End => Err(Self::incomplete(token, index)),
            _ => Err(invalid()),
        }
    }

    fn price_delta(&mut self) -> Result<i64, ValidationError> {
        let (token, index) = self.next();
        let invalid = || ValidationError::at_token(ErrorKind::InvalidPriceFormat, token, index);
        match token.kind() {
            TokenKind::PriceDelta => token.lexeme().parse().map_err(|_| invalid()),
            TokenKind::End => Err(Self::incomplete(token, index)),
            _ => Err(invalid()),
        }
    }
}
