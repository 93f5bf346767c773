//! Infix to postfix conversion.
//!
//! A shunting-yard without a precedence table: `and` and `or` are only
//! resolved when a group closes or the input ends. Grouping is the sole way to
//! control association.
//!
//! ```text
//! { a and ( b or c ) }   =>   a b c or and
//! a and b or c           =>   a b c or and
//! ```

use crate::token::{Token, TokenKind};

/// Convert a validated infix sequence to postfix order.
///
/// Brackets never appear in the output. Positions of the input tokens are
/// preserved so later stages can report where a failure came from.
pub fn to_postfix<'a>(tokens: &[Token<'a>]) -> Vec<Token<'a>> {
    let mut stack: Vec<Token<'a>> = Vec::new();
    let mut output = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind {
            TokenKind::Open(_) | TokenKind::Operator(_) => stack.push(*token),
            TokenKind::Close(_) => {
                while let Some(top) = stack.pop() {
                    if matches!(top.kind, TokenKind::Open(_)) {
                        break; // the opener is discarded
                    }
                    output.push(top);
                }
            }
            TokenKind::Leaf(_) => output.push(*token),
        }
    }

    while let Some(top) = stack.pop() {
        // Only reachable with unbalanced input
        if !matches!(top.kind, TokenKind::Open(_)) {
            output.push(top);
        }
    }

    output
}
