use winnow::combinator::{alt, not, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Shape of a raw lexeme before keyword and code classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceKind {
    LParen,
    RParen,
    Arrow,
    Word,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Piece<'i> {
    pub(crate) kind: PieceKind,
    pub(crate) text: &'i str,
    /// Byte offset into the source.
    pub(crate) start: usize,
}

impl Piece<'_> {
    pub(crate) fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Pieces -----------------------------------------------------------------

fn arrow<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("→", "->")).parse_next(input)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '→'
}

/// A maximal run of word characters that stops before an ASCII arrow, so
/// `K001->B100` splits into three pieces.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    repeat::<_, _, (), _, _>(1.., (not("->"), one_of(is_word_char)))
        .take()
        .parse_next(input)
}

fn piece<'i>(input: &mut &'i str) -> ModalResult<(PieceKind, &'i str)> {
    alt((
        '('.value(PieceKind::LParen),
        ')'.value(PieceKind::RParen),
        arrow.value(PieceKind::Arrow),
        word.value(PieceKind::Word),
    ))
    .with_taken()
    .parse_next(input)
}

// -- Top-level --------------------------------------------------------------

/// Split `source` into pieces. Never fails: a character no alternative
/// accepts becomes a one-character word.
pub(crate) fn pieces(source: &str) -> Vec<Piece<'_>> {
    let mut input = source;
    let mut out = Vec::new();
    loop {
        if ws.parse_next(&mut input).is_err() || input.is_empty() {
            break;
        }
        let start = source.len() - input.len();
        match piece.parse_next(&mut input) {
            Ok((kind, text)) => out.push(Piece { kind, text, start }),
            Err(_) => {
                let Some(c) = input.chars().next() else { break };
                let (text, rest) = input.split_at(c.len_utf8());
                out.push(Piece {
                    kind: PieceKind::Word,
                    text,
                    start,
                });
                input = rest;
            }
        }
    }
    out
}
