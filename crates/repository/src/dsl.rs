//! Boolean query tree emitted by query builders.
//!
//! A [`QueryNode`] is one fragment of an Elasticsearch Query DSL document.
//! Builders create fragments and combine them with `&` (logical AND) and `!`
//! (boolean `must_not`). Conjunctions are flattened as they are combined, so
//! the result is independent of how builders group their contributions.

use std::ops::{BitAnd, Not};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// A node of the boolean query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// `field == value`
    Term {
        /// Field path.
        field: String,
        /// Scalar value (passed through unchanged, including `null`).
        value: Value,
    },
    /// `field ∈ values`
    Terms {
        /// Field path.
        field: String,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// `field` is present and non-null.
    Exists {
        /// Field path.
        field: String,
    },
    /// `gte <= field <= lte`, either bound optional.
    Range {
        /// Field path.
        field: String,
        /// Inclusive lower bound.
        gte: Option<Value>,
        /// Inclusive upper bound.
        lte: Option<Value>,
    },
    /// Boolean `must_not` around a single node.
    Not(Box<QueryNode>),
    /// Conjunction of two or more nodes.
    And(Vec<QueryNode>),
}

impl QueryNode {
    /// Creates a `term` fragment.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryNode::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a `terms` fragment.
    pub fn terms(field: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        QueryNode::Terms {
            field: field.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Creates an `exists` fragment.
    pub fn exists(field: impl Into<String>) -> Self {
        QueryNode::Exists {
            field: field.into(),
        }
    }

    /// Creates a `range` fragment.
    pub fn range(field: impl Into<String>, gte: Option<Value>, lte: Option<Value>) -> Self {
        QueryNode::Range {
            field: field.into(),
            gte,
            lte,
        }
    }

    /// Wraps the node in a boolean `must_not`.
    pub fn negate(self) -> Self {
        QueryNode::Not(Box::new(self))
    }

    /// Combines two nodes with logical AND, flattening nested conjunctions.
    pub fn and(self, other: QueryNode) -> Self {
        match (self, other) {
            (QueryNode::And(mut left), QueryNode::And(right)) => {
                left.extend(right);
                QueryNode::And(left)
            }
            (QueryNode::And(mut left), right) => {
                left.push(right);
                QueryNode::And(left)
            }
            (left, QueryNode::And(right)) => {
                let mut nodes = Vec::with_capacity(right.len() + 1);
                nodes.push(left);
                nodes.extend(right);
                QueryNode::And(nodes)
            }
            (left, right) => QueryNode::And(vec![left, right]),
        }
    }

    /// Returns the conjuncts of this node: the children of an `And`, or the
    /// node itself.
    pub fn conjuncts(&self) -> &[QueryNode] {
        match self {
            QueryNode::And(nodes) => nodes,
            node => std::slice::from_ref(node),
        }
    }

    /// Renders the node as Elasticsearch Query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            QueryNode::Term { field, value } => json!({ "term": { field: value } }),
            QueryNode::Terms { field, values } => json!({ "terms": { field: values } }),
            QueryNode::Exists { field } => json!({ "exists": { "field": field } }),
            QueryNode::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                json!({ "range": { field: Value::Object(bounds) } })
            }
            QueryNode::Not(inner) => json!({
                "bool": {
                    "must_not": [inner.to_json()]
                }
            }),
            QueryNode::And(nodes) => json!({
                "bool": {
                    "must": nodes.iter().map(QueryNode::to_json).collect::<Vec<_>>()
                }
            }),
        }
    }
}

impl BitAnd for QueryNode {
    type Output = QueryNode;

    fn bitand(self, rhs: QueryNode) -> QueryNode {
        self.and(rhs)
    }
}

impl Not for QueryNode {
    type Output = QueryNode;

    fn not(self) -> QueryNode {
        self.negate()
    }
}

impl Serialize for QueryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
