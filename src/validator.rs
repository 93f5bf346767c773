//! Bracket balance validation.

use crate::error::CompileError;
use crate::token::{Token, TokenKind};

/// Check that every opening bracket has a matching, correctly nested closer.
///
/// Any family nests inside any other, but each closer must belong to the
/// family of the opener it closes. Non-bracket tokens are ignored.
pub fn check_balance(tokens: &[Token<'_>]) -> Result<(), CompileError> {
    let mut stack: Vec<&Token<'_>> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Open(_) => stack.push(token),
            TokenKind::Close(closer) => {
                let Some(opener) = stack.pop() else {
                    return Err(CompileError::Structural {
                        position: token.position,
                        reason: format!("'{}' has no matching opener", closer.close_char()),
                    });
                };
                if let TokenKind::Open(family) = opener.kind {
                    if family != closer {
                        return Err(CompileError::Structural {
                            position: token.position,
                            reason: format!(
                                "'{}' at token {} is closed by '{}'",
                                family.open_char(),
                                opener.position,
                                closer.close_char()
                            ),
                        });
                    }
                }
            }
            TokenKind::Operator(_) | TokenKind::Leaf(_) => {}
        }
    }

    // Report the innermost opener left unclosed
    match stack.pop() {
        None => Ok(()),
        Some(opener) => Err(CompileError::Structural {
            position: opener.position,
            reason: format!("'{}' is never closed", opener.text()),
        }),
    }
}

/// Boolean form of [`check_balance`].
pub fn validate(tokens: &[Token<'_>]) -> bool {
    check_balance(tokens).is_ok()
}
