//! Tokenizer for logic expressions.
//!
//! Lexing runs in two steps: a winnow grammar splits the source into
//! parentheses, arrows and words, then each word is classified as a keyword,
//! a literal, a K-code, a BOM code, or an invalid token. Tokenization never
//! fails; unrecognized words are carried forward as [`TokenKind::Invalid`] so
//! the validator can point at them.

mod grammar;
mod token;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ConfigError, ValidatorConfig, DEFAULT_BOM_CODE_PATTERN, DEFAULT_K_CODE_PATTERN};

use self::grammar::{Piece, PieceKind};
pub use self::token::{Token, TokenKind};

const SINGLE_KEYWORDS: [(&str, TokenKind); 8] = [
    ("AND", TokenKind::And),
    ("OR", TokenKind::Or),
    ("NOT", TokenKind::Not),
    ("ON", TokenKind::On),
    ("ADD", TokenKind::Add),
    ("FROM", TokenKind::From),
    ("DELETE", TokenKind::Delete),
    ("TO", TokenKind::To),
];

static DEFAULT_LEXER: Lazy<Lexer> = Lazy::new(|| Lexer {
    k_code: anchored(DEFAULT_K_CODE_PATTERN).expect("default K-code pattern compiles"),
    bom_code: anchored(DEFAULT_BOM_CODE_PATTERN).expect("default BOM code pattern compiles"),
    case_sensitive: false,
});

/// Tokenize with the default code patterns.
///
/// # Example
///
/// ```
/// use bomlogic::lex::{tokenize, TokenKind};
///
/// let kinds: Vec<TokenKind> = tokenize("K001 → B100").iter().map(|t| t.kind()).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::KCode, TokenKind::Implies, TokenKind::BomCode, TokenKind::End]
/// );
/// ```
#[must_use]
pub fn tokenize(raw: &str) -> Vec<Token> {
    DEFAULT_LEXER.tokenize(raw)
}

/// Keyword- and code-aware tokenizer built from a [`ValidatorConfig`].
#[derive(Debug, Clone)]
pub struct Lexer {
    k_code: Regex,
    bom_code: Regex,
    case_sensitive: bool,
}

impl Default for Lexer {
    fn default() -> Self {
        DEFAULT_LEXER.clone()
    }
}

impl Lexer {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a code pattern does not compile.
    pub fn new(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let k_code = anchored(&config.k_code_pattern).map_err(|source| {
            ConfigError::InvalidPattern {
                which: "K-code",
                pattern: config.k_code_pattern.clone(),
                source,
            }
        })?;
        let bom_code = anchored(&config.bom_code_pattern).map_err(|source| {
            ConfigError::InvalidPattern {
                which: "BOM code",
                pattern: config.bom_code_pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            k_code,
            bom_code,
            case_sensitive: config.case_sensitive_keywords,
        })
    }

    /// Split `raw` into tokens, always ending with a [`TokenKind::End`] token.
    #[must_use]
    pub fn tokenize(&self, raw: &str) -> Vec<Token> {
        let pieces = grammar::pieces(raw);
        let mut tokens = Vec::with_capacity(pieces.len() + 1);
        let mut chars = CharCursor::default();
        let mut i = 0;
        while i < pieces.len() {
            let piece = pieces[i];
            let (kind, consumed) = match piece.kind {
                PieceKind::LParen => (TokenKind::LParen, 1),
                PieceKind::RParen => (TokenKind::RParen, 1),
                PieceKind::Arrow => (TokenKind::Implies, 1),
                PieceKind::Word => self.classify_word(&pieces[i..]),
            };
            let end = pieces[i + consumed - 1].end();
            let position = chars.advance_to(raw, piece.start);
            tokens.push(Token::new(kind, &raw[piece.start..end], position, piece.start..end));
            i += consumed;
        }
        let position = chars.advance_to(raw, raw.len());
        tokens.push(Token::new(TokenKind::End, "", position, raw.len()..raw.len()));
        tokens
    }

    /// Whether `word` has the shape of a K-code.
    #[must_use]
    pub fn is_k_code(&self, word: &str) -> bool {
        self.k_code.is_match(word)
    }

    /// Whether `word` has the shape of a BOM code.
    #[must_use]
    pub fn is_bom_code(&self, word: &str) -> bool {
        self.bom_code.is_match(word)
    }

    /// Classify the word at the head of `pieces`, returning how many pieces
    /// the token spans (multi-word keywords take two or three).
    fn classify_word(&self, pieces: &[Piece<'_>]) -> (TokenKind, usize) {
        let word = pieces[0].text;
        if self.keyword_eq(word, "CHANGE") {
            let next = word_at(pieces, 1);
            if next.is_some_and(|w| self.keyword_eq(w, "PRICE")) {
                return (TokenKind::ChangePrice, 2);
            }
            if next.is_some_and(|w| self.keyword_eq(w, "QUANTITY")) {
                if word_at(pieces, 2).is_some_and(|w| self.keyword_eq(w, "OF")) {
                    return (TokenKind::ChangeQuantityOf, 3);
                }
                return (TokenKind::Invalid, 2);
            }
            return (TokenKind::Invalid, 1);
        }
        if let Some((_, kind)) = SINGLE_KEYWORDS
            .iter()
            .find(|(spelling, _)| self.keyword_eq(word, spelling))
        {
            return (*kind, 1);
        }
        (self.classify_literal(word), 1)
    }

    fn classify_literal(&self, word: &str) -> TokenKind {
        if is_price_delta(word) {
            TokenKind::PriceDelta
        } else if word.bytes().all(|b| b.is_ascii_digit()) {
            TokenKind::Number
        } else if self.is_k_code(word) {
            TokenKind::KCode
        } else if self.is_bom_code(word) {
            TokenKind::BomCode
        } else {
            TokenKind::Invalid
        }
    }

    fn keyword_eq(&self, word: &str, keyword: &str) -> bool {
        if self.case_sensitive {
            word == keyword
        } else {
            word.eq_ignore_ascii_case(keyword)
        }
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

fn word_at<'i>(pieces: &[Piece<'i>], index: usize) -> Option<&'i str> {
    pieces
        .get(index)
        .filter(|p| p.kind == PieceKind::Word)
        .map(|p| p.text)
}

fn is_price_delta(word: &str) -> bool {
    match word.as_bytes() {
        [b'+' | b'-', digits @ ..] => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// Converts monotonically increasing byte offsets to character offsets.
#[derive(Debug, Default)]
struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    fn advance_to(&mut self, source: &str, byte: usize) -> usize {
        self.chars += source[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(raw: &str) -> Vec<TokenKind> {
        tokenize(raw).iter().map(Token::kind).collect()
    }

    #[test]
    fn boolean_expression() {
        assert_eq!(
            kinds("NOT (K001 AND K002) → B100 OR PL-X1"),
            vec![
                TokenKind::Not,
                TokenKind::LParen,
                TokenKind::KCode,
                TokenKind::And,
                TokenKind::KCode,
                TokenKind::RParen,
                TokenKind::Implies,
                TokenKind::BomCode,
                TokenKind::Or,
                TokenKind::BomCode,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn multi_word_keywords_merge() {
        let tokens = tokenize("CHANGE  QUANTITY OF B1 TO 3");
        assert_eq!(tokens[0].kind(), TokenKind::ChangeQuantityOf);
        assert_eq!(tokens[0].lexeme(), "CHANGE  QUANTITY OF");
        assert_eq!(tokens[1].position(), 20);
        assert_eq!(tokens[3].kind(), TokenKind::Number);

        assert_eq!(
            kinds("change price +15"),
            vec![TokenKind::ChangePrice, TokenKind::PriceDelta, TokenKind::End]
        );
    }

    #[test]
    fn unfinished_multi_word_keyword_is_invalid() {
        let tokens = tokenize("CHANGE QUANTITY B1");
        assert_eq!(tokens[0].kind(), TokenKind::Invalid);
        assert_eq!(tokens[0].lexeme(), "CHANGE QUANTITY");
        assert_eq!(tokens[1].kind(), TokenKind::BomCode);

        assert_eq!(kinds("CHANGE"), vec![TokenKind::Invalid, TokenKind::End]);
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds("+5 -12 42 4.2 +"),
            vec![
                TokenKind::PriceDelta,
                TokenKind::PriceDelta,
                TokenKind::Number,
                TokenKind::Invalid,
                TokenKind::Invalid,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn code_shapes() {
        assert_eq!(
            kinds("K001 K-200-000017 B100 PL-AB-1 X9 K"),
            vec![
                TokenKind::KCode,
                TokenKind::KCode,
                TokenKind::BomCode,
                TokenKind::BomCode,
                TokenKind::Invalid,
                TokenKind::Invalid,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn positions_are_character_offsets() {
        let tokens = tokenize("K1 → B1");
        assert_eq!(tokens[1].position(), 3);
        assert_eq!(tokens[2].position(), 5);
        assert_eq!(tokens[2].span(), 7..9);
        assert_eq!(tokens[3].position(), 7);
    }

    #[test]
    fn case_sensitive_keywords() {
        let config = ValidatorConfig::default().case_sensitive_keywords(true);
        let lexer = Lexer::new(&config).unwrap();
        let tokens = lexer.tokenize("K1 and K2");
        assert_eq!(tokens[1].kind(), TokenKind::Invalid);
        let tokens = lexer.tokenize("K1 AND K2");
        assert_eq!(tokens[1].kind(), TokenKind::And);
    }

    #[test]
    fn custom_patterns_are_anchored() {
        let config = ValidatorConfig::default().bom_code_pattern(r"BOM\d");
        let lexer = Lexer::new(&config).unwrap();
        assert!(lexer.is_bom_code("BOM1"));
        assert!(!lexer.is_bom_code("XBOM12"));
    }

    #[test]
    fn bad_pattern_is_reported() {
        let config = ValidatorConfig::default().k_code_pattern("K(");
        let err = Lexer::new(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { which: "K-code", .. }));
    }

    #[test]
    fn empty_input_yields_only_end() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::End);
        assert_eq!(tokens[0].position(), 0);
    }
}
