//! Leaf operator handlers for key-value leaves such as `age>=18` or
//! `tag~[red,blue]`.
//!
//! | Operator | Node |
//! |---|---|
//! | `=`  | `Term` when the value is double-quoted (quotes stripped), else `Match` |
//! | `!=` | `Negated(Term)`, value verbatim |
//! | `>` `>=` `<` `<=` | `Range` |
//! | `~`  | `Terms` from a bracketed, comma separated list |
//! | `!~` | `Negated(Terms)` |

use crate::ast::{QueryNode, RangeKind};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

// Two-character operators come first so `!=` never splits as `!` + `=`.
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!=|!~|<=|>=|<|>|=|~").expect("valid operator regex"));

/// Result of a handler: the node, or the reason the value was rejected.
pub type HandlerResult = Result<QueryNode, &'static str>;

/// A pure function from `(field, value)` to a node.
pub type LeafHandler = fn(&str, &str) -> HandlerResult;

/// Comparison operators recognized inside a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,    // =
    NotEq, // !=
    Gt,    // >
    Gte,   // >=
    Lt,    // <
    Lte,   // <=
    In,    // ~
    NotIn, // !~
}

impl FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(ComparisonOp::Eq),
            "!=" => Ok(ComparisonOp::NotEq),
            ">" => Ok(ComparisonOp::Gt),
            ">=" => Ok(ComparisonOp::Gte),
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Lte),
            "~" => Ok(ComparisonOp::In),
            "!~" => Ok(ComparisonOp::NotIn),
            _ => Err(format!("'{}' is not a valid operator", s)),
        }
    }
}

impl ComparisonOp {
    /// The dispatch table.
    pub fn handler(self) -> LeafHandler {
        match self {
            ComparisonOp::Eq => term,
            ComparisonOp::NotEq => not_equal_to,
            ComparisonOp::Gt => greater_than,
            ComparisonOp::Gte => greater_than_or_equal,
            ComparisonOp::Lt => less_than,
            ComparisonOp::Lte => less_than_or_equal,
            ComparisonOp::In => is_in,
            ComparisonOp::NotIn => not_in,
        }
    }

    pub fn apply(self, field: &str, value: &str) -> HandlerResult {
        (self.handler())(field, value)
    }
}

/// A key-value leaf split around its single operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafParts<'a> {
    pub field: &'a str,
    pub operator: &'a str,
    pub value: &'a str,
}

/// Split a leaf into field, operator and value.
///
/// Exactly one operator occurrence is allowed: `a==1` contains two and is
/// rejected, as is a leaf with none.
pub fn split_leaf(leaf: &str) -> Result<LeafParts<'_>, String> {
    let mut found = OPERATOR_RE.find_iter(leaf);
    let Some(op) = found.next() else {
        return Err("no comparison operator found".to_string());
    };
    if found.next().is_some() {
        return Err("expected exactly one comparison operator".to_string());
    }

    Ok(LeafParts {
        field: &leaf[..op.start()],
        operator: op.as_str(),
        value: &leaf[op.end()..],
    })
}

/// `=`: exact term when the value carries quotes, analyzed match otherwise.
pub fn term(field: &str, value: &str) -> HandlerResult {
    if !value.contains('"') {
        return Ok(QueryNode::matches(field, value));
    }
    Ok(QueryNode::term(field, &value.replace('"', "")))
}

/// `!=`: always an exact negation; quoting is not consulted.
pub fn not_equal_to(field: &str, value: &str) -> HandlerResult {
    Ok(QueryNode::negated(QueryNode::term(field, value)))
}

pub fn greater_than(field: &str, value: &str) -> HandlerResult {
    Ok(QueryNode::range(field, RangeKind::Gt, value))
}

pub fn greater_than_or_equal(field: &str, value: &str) -> HandlerResult {
    Ok(QueryNode::range(field, RangeKind::Gte, value))
}

pub fn less_than(field: &str, value: &str) -> HandlerResult {
    Ok(QueryNode::range(field, RangeKind::Lt, value))
}

pub fn less_than_or_equal(field: &str, value: &str) -> HandlerResult {
    Ok(QueryNode::range(field, RangeKind::Lte, value))
}

pub fn is_in(field: &str, value: &str) -> HandlerResult {
    let values = parse_list(value)?;
    Ok(QueryNode::Terms {
        field: field.to_string(),
        values,
    })
}

pub fn not_in(field: &str, value: &str) -> HandlerResult {
    is_in(field, value).map(QueryNode::negated)
}

/// Strip one leading and one trailing bracket and split on commas.
/// Pieces are not trimmed and commas cannot be escaped.
fn parse_list(value: &str) -> Result<Vec<String>, &'static str> {
    let mut chars = value.chars();
    let opens = chars.next().is_some_and(|c| matches!(c, '[' | '(' | '{'));
    let closes = chars.next_back().is_some_and(|c| matches!(c, ']' | ')' | '}'));
    if !opens || !closes {
        return Err("membership list must be enclosed in brackets");
    }
    Ok(chars.as_str().split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefers_longest_operator() {
        let parts = split_leaf("a!=1").unwrap();
        assert_eq!((parts.field, parts.operator, parts.value), ("a", "!=", "1"));

        let parts = split_leaf("age>=18").unwrap();
        assert_eq!((parts.field, parts.operator, parts.value), ("age", ">=", "18"));

        let parts = split_leaf("tag!~[x]").unwrap();
        assert_eq!(parts.operator, "!~");
    }

    #[test]
    fn test_split_rejects_zero_or_many_operators() {
        assert!(split_leaf("plain").is_err());
        assert!(split_leaf("a==1").is_err());
        assert!(split_leaf("a<b<c").is_err());
    }

    #[test]
    fn test_term_quoting() {
        assert_eq!(term("a", "1"), Ok(QueryNode::matches("a", "1")));
        assert_eq!(term("a", "\"1\""), Ok(QueryNode::term("a", "1")));
        assert_eq!(term("name", "\"John Doe\""), Ok(QueryNode::term("name", "John Doe")));
    }

    #[test]
    fn test_not_equal_ignores_quoting() {
        assert_eq!(
            not_equal_to("a", "\"1\""),
            Ok(QueryNode::negated(QueryNode::term("a", "\"1\"")))
        );
    }

    #[test]
    fn test_dispatch_table() {
        let op: ComparisonOp = "<".parse().unwrap();
        assert_eq!(op.apply("exp", "10"), Ok(QueryNode::range("exp", RangeKind::Lt, "10")));

        let op: ComparisonOp = ">".parse().unwrap();
        assert_eq!(op.apply("n", "abc"), Ok(QueryNode::range("n", RangeKind::Gt, "abc")));

        let op: ComparisonOp = "<=".parse().unwrap();
        assert_eq!(op.apply("n", "3"), Ok(QueryNode::range("n", RangeKind::Lte, "3")));

        assert!("==".parse::<ComparisonOp>().is_err());
        assert!("!".parse::<ComparisonOp>().is_err());
    }

    #[test]
    fn test_membership_lists() {
        assert_eq!(
            is_in("abcd", "[kaka,baba,adithya]"),
            Ok(QueryNode::terms("abcd", &["kaka", "baba", "adithya"]))
        );
        // No trimming around commas
        assert_eq!(is_in("a", "(x, y)"), Ok(QueryNode::terms("a", &["x", " y"])));
        assert_eq!(is_in("a", "[]"), Ok(QueryNode::terms("a", &[""])));
        assert_eq!(
            not_in("a", "{p,q}"),
            Ok(QueryNode::negated(QueryNode::terms("a", &["p", "q"])))
        );
    }

    #[test]
    fn test_membership_requires_brackets() {
        assert!(is_in("a", "x,y").is_err());
        assert!(is_in("a", "[x,y").is_err());
        assert!(is_in("a", "[").is_err());
        assert!(not_in("a", "").is_err());
    }
}
