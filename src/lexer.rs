//! Delimiter tokenizer for raw filter strings.

use crate::token::Token;
use std::str::Split;

/// The delimiter used when none is configured. Chosen so it never collides
/// with brackets or comparison operators.
pub const DEFAULT_DELIMITER: &str = "||__||";

pub struct Lexer<'a> {
    pieces: Split<'a, &'a str>,
    /// Index of the next token in the sequence
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, delimiter: &'a str) -> Self {
        Lexer {
            pieces: input.split(delimiter),
            position: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Empty pieces are kept: "a||__||||__||b" has an empty leaf in the middle
        let piece = self.pieces.next()?;
        let token = Token::new(piece, self.position);
        self.position += 1;
        Some(token)
    }
}

/// Split `input` on `delimiter` and classify every piece.
pub fn tokenize<'a>(input: &'a str, delimiter: &'a str) -> Vec<Token<'a>> {
    Lexer::new(input, delimiter).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Bracket, LogicalOp, TokenKind};

    fn join(parts: &[&str]) -> String {
        parts.join(DEFAULT_DELIMITER)
    }

    #[test]
    fn test_simple_expression() {
        let input = join(&["(", "a=1", "and", "b>2", ")"]);
        let kinds: Vec<_> = tokenize(&input, DEFAULT_DELIMITER)
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Open(Bracket::Round),
                TokenKind::Leaf("a=1"),
                TokenKind::Operator(LogicalOp::And),
                TokenKind::Leaf("b>2"),
                TokenKind::Close(Bracket::Round),
            ]
        );
    }

    #[test]
    fn test_positions_are_sequential() {
        let input = join(&["{", "x", "or", "y", "}"]);
        let positions: Vec<_> = Lexer::new(&input, DEFAULT_DELIMITER)
            .map(|t| t.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_pieces_are_kept() {
        let input = format!("a{d}{d}b", d = DEFAULT_DELIMITER);
        let kinds: Vec<_> = tokenize(&input, DEFAULT_DELIMITER)
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Leaf("a"), TokenKind::Leaf(""), TokenKind::Leaf("b")]
        );
    }

    #[test]
    fn test_no_trimming() {
        let tokens = tokenize(" a = 1 | and ", "|");
        assert_eq!(tokens[0].kind, TokenKind::Leaf(" a = 1 "));
        assert_eq!(tokens[1].kind, TokenKind::Leaf(" and "));
    }

    #[test]
    fn test_custom_delimiter() {
        let tokens = tokenize("( a or b )", " ");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[2].kind, TokenKind::Operator(LogicalOp::Or));
    }
}
