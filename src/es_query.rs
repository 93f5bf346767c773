//! Search-engine boolean query rendering for [`QueryNode`] trees.
//!
//! | Node | JSON |
//! |---|---|
//! | `Match` | `{"match": {field: value}}` |
//! | `Term` | `{"term": {field: value}}` |
//! | `Range` | `{"range": {field: {"gte": value}}}` |
//! | `Terms` | `{"terms": {field: [values]}}` |
//! | `Negated` | `{"bool": {"must_not": [inner]}}` |
//! | `And` | `{"bool": {"must": [children]}}` |
//! | `Or` | `{"bool": {"should": [children]}}` |

use crate::ast::{QueryNode, RangeKind};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("expected a JSON object with exactly one key, got: {0}")]
    NotSingleKey(String),

    #[error("unknown clause '{0}'")]
    UnknownClause(String),

    #[error("malformed '{clause}' clause: {reason}")]
    Malformed { clause: String, reason: String },
}

impl QueryNode {
    /// Render the tree as a search-engine query value.
    pub fn to_es_json(&self) -> Value {
        match self {
            QueryNode::Match { field, value } => json!({ "match": { field: value } }),
            QueryNode::Term { field, value } => json!({ "term": { field: value } }),
            QueryNode::Range { field, kind, value } => {
                json!({ "range": { field: { kind.keyword(): value } } })
            }
            QueryNode::Terms { field, values } => json!({ "terms": { field: values } }),
            QueryNode::Negated(inner) => json!({ "bool": { "must_not": [inner.to_es_json()] } }),
            QueryNode::And(children) => json!({ "bool": { "must": render_all(children) } }),
            QueryNode::Or(children) => json!({ "bool": { "should": render_all(children) } }),
        }
    }

    /// Read back a tree produced by [`QueryNode::to_es_json`].
    pub fn from_es_json(value: &Value) -> Result<Self, RenderError> {
        let (clause, body) = single_entry(value)?;
        match clause.as_str() {
            "match" => {
                let (field, value) = field_string(clause, body)?;
                Ok(QueryNode::Match { field, value })
            }
            "term" => {
                let (field, value) = field_string(clause, body)?;
                Ok(QueryNode::Term { field, value })
            }
            "range" => {
                let (field, bounds) = single_entry(body)?;
                let (keyword, bound) = single_entry(bounds)?;
                let kind = RangeKind::from_keyword(keyword)
                    .ok_or_else(|| malformed(clause, format!("unknown bound '{}'", keyword)))?;
                let value = as_string(clause, bound)?;
                Ok(QueryNode::Range {
                    field: field.clone(),
                    kind,
                    value,
                })
            }
            "terms" => {
                let (field, list) = single_entry(body)?;
                let values = list
                    .as_array()
                    .ok_or_else(|| malformed(clause, "expected an array".to_string()))?
                    .iter()
                    .map(|v| as_string(clause, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryNode::Terms {
                    field: field.clone(),
                    values,
                })
            }
            "bool" => read_bool(body),
            other => Err(RenderError::UnknownClause(other.to_string())),
        }
    }
}

impl Serialize for QueryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_es_json().serialize(serializer)
    }
}

fn render_all(children: &[QueryNode]) -> Vec<Value> {
    children.iter().map(QueryNode::to_es_json).collect()
}

fn read_bool(body: &Value) -> Result<QueryNode, RenderError> {
    let (occur, list) = single_entry(body)?;
    let mut children = list
        .as_array()
        .ok_or_else(|| malformed("bool", format!("'{}' must be an array", occur)))?
        .iter()
        .map(QueryNode::from_es_json)
        .collect::<Result<Vec<_>, _>>()?;

    match occur.as_str() {
        "must" => Ok(QueryNode::And(children)),
        "should" => Ok(QueryNode::Or(children)),
        "must_not" => match (children.pop(), children.is_empty()) {
            (Some(inner), true) => Ok(QueryNode::negated(inner)),
            _ => Err(malformed("bool", "'must_not' must hold exactly one clause".to_string())),
        },
        other => Err(malformed("bool", format!("unknown occurrence '{}'", other))),
    }
}

fn single_entry(value: &Value) -> Result<(&String, &Value), RenderError> {
    let map: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| RenderError::NotSingleKey(value.to_string()))?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(RenderError::NotSingleKey(value.to_string())),
    }
}

fn field_string(clause: &str, body: &Value) -> Result<(String, String), RenderError> {
    let (field, value) = single_entry(body)?;
    Ok((field.clone(), as_string(clause, value)?))
}

fn as_string(clause: &str, value: &Value) -> Result<String, RenderError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(clause, format!("expected a string, got {}", value)))
}

fn malformed(clause: &str, reason: String) -> RenderError {
    RenderError::Malformed {
        clause: clause.to_string(),
        reason,
    }
}
