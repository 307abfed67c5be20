use std::fmt;
use std::ops::Range;

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    KCode,
    BomCode,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Implies,
    On,
    Add,
    From,
    Delete,
    ChangeQuantityOf,
    To,
    ChangePrice,
    /// Unsigned digit run: a quantity, or a numeric BOM code.
    Number,
    /// Signed digit run such as `+100` or `-25`.
    PriceDelta,
    /// A word matching no keyword and no code shape.
    Invalid,
    /// Zero-width marker after the last token.
    End,
}

impl TokenKind {
    /// Any keyword belonging to the tuning directives.
    #[must_use]
    pub fn is_tuning_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::On
                | TokenKind::Add
                | TokenKind::From
                | TokenKind::Delete
                | TokenKind::ChangeQuantityOf
                | TokenKind::To
                | TokenKind::ChangePrice
        )
    }

    /// Keywords that begin a tuning construct.
    #[must_use]
    pub fn opens_tuning(self) -> bool {
        matches!(
            self,
            TokenKind::On | TokenKind::From | TokenKind::ChangeQuantityOf | TokenKind::ChangePrice
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::KCode => "K-code",
            TokenKind::BomCode => "BOM code",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Implies => "→",
            TokenKind::On => "ON",
            TokenKind::Add => "ADD",
            TokenKind::From => "FROM",
            TokenKind::Delete => "DELETE",
            TokenKind::ChangeQuantityOf => "CHANGE QUANTITY OF",
            TokenKind::To => "TO",
            TokenKind::ChangePrice => "CHANGE PRICE",
            TokenKind::Number => "number",
            TokenKind::PriceDelta => "price delta",
            TokenKind::Invalid => "invalid token",
            TokenKind::End => "end of input",
        };
        f.write_str(name)
    }
}

/// A classified slice of an expression.
///
/// `position` counts characters, not bytes, so it can be used directly as a
/// cursor offset by an editor. `span` is the byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    position: usize,
    span: Range<usize>,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, lexeme: &str, position: usize, span: Range<usize>) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_owned(),
            position,
            span,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact source text of the token, inner whitespace of multi-word
    /// keywords included.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "{} @{}", self.kind, self.position),
            _ => write!(f, "{} '{}' @{}", self.kind, self.lexeme, self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_keyword_classes() {
        assert!(TokenKind::To.is_tuning_keyword());
        assert!(!TokenKind::To.opens_tuning());
        assert!(TokenKind::ChangePrice.opens_tuning());
        assert!(!TokenKind::Implies.is_tuning_keyword());
    }

    #[test]
    fn token_display() {
        let t = Token::new(TokenKind::KCode, "K001", 4, 4..8);
        assert_eq!(t.to_string(), "K-code 'K001' @4");
        let end = Token::new(TokenKind::End, "", 8, 8..8);
        assert_eq!(end.to_string(), "end of input @8");
    }
}
