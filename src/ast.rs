//! The compiled query tree.

use std::fmt;

/// One compiled condition or combinator. Each node is owned by its parent;
/// the root is owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Analyzed text match
    Match { field: String, value: String },
    /// Exact match
    Term { field: String, value: String },
    /// Range comparison, value passed through uninterpreted
    Range {
        field: String,
        kind: RangeKind,
        value: String,
    },
    /// Membership test
    Terms { field: String, values: Vec<String> },
    Negated(Box<QueryNode>),
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
}

/// Range comparison kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Gt,  // >
    Gte, // >=
    Lt,  // <
    Lte, // <=
}

impl RangeKind {
    /// The keyword used by the search engine's range clause.
    pub fn keyword(self) -> &'static str {
        match self {
            RangeKind::Gt => "gt",
            RangeKind::Gte => "gte",
            RangeKind::Lt => "lt",
            RangeKind::Lte => "lte",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "gt" => Some(RangeKind::Gt),
            "gte" => Some(RangeKind::Gte),
            "lt" => Some(RangeKind::Lt),
            "lte" => Some(RangeKind::Lte),
            _ => None,
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl QueryNode {
    pub fn matches(field: &str, value: &str) -> Self {
        QueryNode::Match {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn term(field: &str, value: &str) -> Self {
        QueryNode::Term {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn range(field: &str, kind: RangeKind, value: &str) -> Self {
        QueryNode::Range {
            field: field.to_string(),
            kind,
            value: value.to_string(),
        }
    }

    pub fn terms<S: AsRef<str>>(field: &str, values: &[S]) -> Self {
        QueryNode::Terms {
            field: field.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn negated(inner: QueryNode) -> Self {
        QueryNode::Negated(Box::new(inner))
    }

    /// Number of nodes in the tree, including this one.
    pub fn node_count(&self) -> usize {
        match self {
            QueryNode::Negated(inner) => 1 + inner.node_count(),
            QueryNode::And(children) | QueryNode::Or(children) => {
                1 + children.iter().map(QueryNode::node_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Merge directly nested combinators of the same kind.
    ///
    /// `And([And([a, b]), c])` becomes `And([a, b, c])`; an `Or` under an `And`
    /// is kept as a child. Leaves and negations are otherwise untouched.
    pub fn flatten(self) -> Self {
        match self {
            QueryNode::And(children) => QueryNode::And(flatten_children(children, true)),
            QueryNode::Or(children) => QueryNode::Or(flatten_children(children, false)),
            QueryNode::Negated(inner) => QueryNode::Negated(Box::new(inner.flatten())),
            leaf => leaf,
        }
    }
}

fn flatten_children(children: Vec<QueryNode>, is_and: bool) -> Vec<QueryNode> {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match (child.flatten(), is_and) {
            (QueryNode::And(inner), true) | (QueryNode::Or(inner), false) => flat.extend(inner),
            (other, _) => flat.push(other),
        }
    }
    flat
}
