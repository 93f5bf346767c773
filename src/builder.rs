//! Postfix evaluation into a query tree.
//!
//! Both modes share the same stack machine and differ only in how a leaf
//! becomes a node:
//!
//! - key-value mode: `field<op>value` is split and dispatched through
//!   [`ComparisonOp::handler`];
//! - value-only mode: a bare value is broadcast as an `Or` across the
//!   caller's fields.

use crate::ast::QueryNode;
use crate::error::CompileError;
use crate::handlers::{self, split_leaf, ComparisonOp};
use crate::token::{LogicalOp, Token, TokenKind};

/// Evaluate a postfix sequence of key-value leaves.
pub fn build_key_value(postfix: &[Token<'_>]) -> Result<QueryNode, CompileError> {
    evaluate(postfix, key_value_leaf)
}

/// Evaluate a postfix sequence of bare values, broadcasting each across `fields`.
pub fn build_value_only<F: AsRef<str>>(
    postfix: &[Token<'_>],
    fields: &[F],
) -> Result<QueryNode, CompileError> {
    if fields.is_empty() {
        return Err(CompileError::NoFields);
    }
    evaluate(postfix, |token, value| value_only_leaf(token, value, fields))
}

fn key_value_leaf(token: &Token<'_>, leaf: &str) -> Result<QueryNode, CompileError> {
    let invalid = |reason: String| CompileError::Expression {
        position: token.position,
        token: leaf.to_string(),
        reason,
    };

    let parts = split_leaf(leaf).map_err(invalid)?;
    let op: ComparisonOp = parts.operator.parse().map_err(invalid)?;
    op.apply(parts.field, parts.value)
        .map_err(|reason| invalid(reason.to_string()))
}

fn value_only_leaf<F: AsRef<str>>(
    token: &Token<'_>,
    value: &str,
    fields: &[F],
) -> Result<QueryNode, CompileError> {
    let per_field = fields
        .iter()
        .map(|field| handlers::term(field.as_ref(), value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|reason| CompileError::Expression {
            position: token.position,
            token: value.to_string(),
            reason: reason.to_string(),
        })?;
    Ok(QueryNode::Or(per_field))
}

fn evaluate<L>(postfix: &[Token<'_>], mut leaf: L) -> Result<QueryNode, CompileError>
where
    L: FnMut(&Token<'_>, &str) -> Result<QueryNode, CompileError>,
{
    let mut stack: Vec<QueryNode> = Vec::new();

    for token in postfix {
        match token.kind {
            TokenKind::Leaf(text) => {
                let node = leaf(token, text)?;
                tracing::trace!(position = token.position, ?node, "leaf");
                stack.push(node);
            }
            TokenKind::Operator(op) => {
                if stack.len() < 2 {
                    return Err(CompileError::StackUnderflow {
                        position: token.position,
                        operator: op.as_str().to_string(),
                        available: stack.len(),
                    });
                }
                // The more recently pushed operand pops first
                let op2 = stack.pop().ok_or(CompileError::Incomplete { remaining: 0 })?;
                let op1 = stack.pop().ok_or(CompileError::Incomplete { remaining: 0 })?;
                let node = match op {
                    LogicalOp::And => QueryNode::And(vec![op1, op2]),
                    LogicalOp::Or => QueryNode::Or(vec![op1, op2]),
                };
                stack.push(node);
            }
            TokenKind::Open(_) | TokenKind::Close(_) => {
                return Err(CompileError::Structural {
                    position: token.position,
                    reason: format!("unexpected '{}' in postfix sequence", token.text()),
                });
            }
        }
    }

    match stack.len() {
        1 => stack.pop().ok_or(CompileError::Incomplete { remaining: 0 }),
        remaining => Err(CompileError::Incomplete { remaining }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RangeKind;
    use crate::postfix::to_postfix;

    fn kv(raw: &[&str]) -> Result<QueryNode, CompileError> {
        build_key_value(&to_postfix(&Token::classify_all(raw)))
    }

    fn vo(raw: &[&str], fields: &[&str]) -> Result<QueryNode, CompileError> {
        build_value_only(&to_postfix(&Token::classify_all(raw)), fields)
    }

    #[test]
    fn test_single_leaves() {
        assert_eq!(kv(&["a=1"]), Ok(QueryNode::matches("a", "1")));
        assert_eq!(kv(&["a=\"1\""]), Ok(QueryNode::term("a", "1")));
        assert_eq!(
            kv(&["a!=1"]),
            Ok(QueryNode::negated(QueryNode::term("a", "1")))
        );
        assert_eq!(kv(&["a>=5"]), Ok(QueryNode::range("a", RangeKind::Gte, "5")));
        assert_eq!(kv(&["a~[x,y,z]"]), Ok(QueryNode::terms("a", &["x", "y", "z"])));
        assert_eq!(
            kv(&["a!~[x]"]),
            Ok(QueryNode::negated(QueryNode::terms("a", &["x"])))
        );
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(
            kv(&["a=1", "and", "b=2"]),
            Ok(QueryNode::And(vec![
                QueryNode::matches("a", "1"),
                QueryNode::matches("b", "2"),
            ]))
        );
    }

    #[test]
    fn test_nested_key_value() {
        let raw = [
            "{", "gender=\"male\"", "and", "(", "(", "education>=5", "or", "address=everything",
            ")", "or", "(", "exp<10", "or", "abcd~[kaka,baba,adithya]", ")", ")", "}",
        ];
        let expected = QueryNode::And(vec![
            QueryNode::term("gender", "male"),
            QueryNode::Or(vec![
                QueryNode::Or(vec![
                    QueryNode::range("education", RangeKind::Gte, "5"),
                    QueryNode::matches("address", "everything"),
                ]),
                QueryNode::Or(vec![
                    QueryNode::range("exp", RangeKind::Lt, "10"),
                    QueryNode::terms("abcd", &["kaka", "baba", "adithya"]),
                ]),
            ]),
        ]);
        assert_eq!(kv(&raw), Ok(expected));
    }

    #[test]
    fn test_malformed_leaf() {
        let err = kv(&["(", "a=1", "and", "a==1", ")"]).unwrap_err();
        assert!(matches!(err, CompileError::Expression { position: 3, .. }));

        let err = kv(&["justtext"]).unwrap_err();
        assert!(matches!(err, CompileError::Expression { position: 0, .. }));

        let err = kv(&["a~x,y"]).unwrap_err();
        assert!(matches!(err, CompileError::Expression { .. }));
    }

    #[test]
    fn test_stack_underflow() {
        let err = kv(&["a=1", "and"]).unwrap_err();
        assert_eq!(
            err,
            CompileError::StackUnderflow {
                position: 1,
                operator: "and".to_string(),
                available: 1,
            }
        );
    }

    #[test]
    fn test_incomplete_stack() {
        assert_eq!(kv(&["a=1", "b=2"]), Err(CompileError::Incomplete { remaining: 2 }));
        assert_eq!(kv(&[]), Err(CompileError::Incomplete { remaining: 0 }));
    }

    #[test]
    fn test_value_only_broadcast() {
        assert_eq!(
            vo(&["a"], &["f1", "f2"]),
            Ok(QueryNode::Or(vec![
                QueryNode::matches("f1", "a"),
                QueryNode::matches("f2", "a"),
            ]))
        );
        assert_eq!(
            vo(&["\"a\""], &["f1", "f2"]),
            Ok(QueryNode::Or(vec![
                QueryNode::term("f1", "a"),
                QueryNode::term("f2", "a"),
            ]))
        );
    }

    #[test]
    fn test_value_only_does_not_split_operators() {
        assert_eq!(
            vo(&["a=1"], &["f"]),
            Ok(QueryNode::Or(vec![QueryNode::matches("f", "a=1")]))
        );
    }

    #[test]
    fn test_value_only_requires_fields() {
        assert_eq!(vo(&["a"], &[]), Err(CompileError::NoFields));
    }
}
