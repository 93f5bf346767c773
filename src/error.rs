use thiserror::Error;

/// Errors that abort a compilation. No partial tree is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Unbalanced or mismatched grouping symbols.
    #[error("unbalanced grouping at token {position}: {reason}")]
    Structural { position: usize, reason: String },

    /// A leaf that does not split into field, operator and value, or whose
    /// operator has no handler.
    #[error("invalid expression '{token}' at token {position}: {reason}")]
    Expression {
        position: usize,
        token: String,
        reason: String,
    },

    #[error("operator '{operator}' at token {position} needs two operands, found {available}")]
    StackUnderflow {
        position: usize,
        operator: String,
        available: usize,
    },

    /// The postfix sequence did not reduce to a single root.
    #[error("malformed expression: {remaining} nodes left after evaluation, expected 1")]
    Incomplete { remaining: usize },

    #[error("value-only compilation requires at least one field")]
    NoFields,
}

impl CompileError {
    /// Position of the offending token, when one exists.
    pub fn position(&self) -> Option<usize> {
        match self {
            CompileError::Structural { position, .. }
            | CompileError::Expression { position, .. }
            | CompileError::StackUnderflow { position, .. } => Some(*position),
            CompileError::Incomplete { .. } | CompileError::NoFields => None,
        }
    }
}
