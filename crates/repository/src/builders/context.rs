//! Shared state for a single query build.

use std::fmt;

use serde_json::{Value, json};

use crate::dsl::QueryNode;
use crate::query::{Document, RepositoryQuery};

/// Mutable context handed to every builder of one build invocation.
///
/// Holds the source query (read-only) and two accumulating trees: the
/// non-scoring `filter` and the scoring `query`. Builders only ever add to
/// them with logical AND, so the final trees do not depend on builder order.
pub struct QueryBuilderContext<'a, T: Document> {
    source: &'a (dyn RepositoryQuery<Document = T> + Sync),
    filter: Option<QueryNode>,
    query: Option<QueryNode>,
}

impl<'a, T: Document> QueryBuilderContext<'a, T> {
    /// Creates an empty context for `source`.
    pub fn new<Q>(source: &'a Q) -> Self
    where
        Q: RepositoryQuery<Document = T> + Sync,
    {
        Self {
            source,
            filter: None,
            query: None,
        }
    }

    /// The query being translated.
    ///
    /// The returned reference outlives the borrow of the context, so option
    /// values can be read while the trees are being extended.
    pub fn source(&self) -> &'a (dyn RepositoryQuery<Document = T> + Sync) {
        self.source
    }

    /// The accumulated filter, if any builder contributed one.
    pub fn filter(&self) -> Option<&QueryNode> {
        self.filter.as_ref()
    }

    /// The accumulated scoring query, if any builder contributed one.
    pub fn query(&self) -> Option<&QueryNode> {
        self.query.as_ref()
    }

    /// ANDs `node` into the filter.
    pub fn and_filter(&mut self, node: QueryNode) {
        self.filter = Some(match self.filter.take() {
            Some(filter) => filter & node,
            None => node,
        });
    }

    /// ANDs `node` into the scoring query.
    pub fn and_query(&mut self, node: QueryNode) {
        self.query = Some(match self.query.take() {
            Some(query) => query & node,
            None => node,
        });
    }

    /// Renders the `query` section of a search request body.
    ///
    /// ```json
    /// { "bool": { "must": [...], "filter": [...] } }
    /// ```
    ///
    /// Falls back to `match_all` when no builder contributed anything.
    pub fn to_query_json(&self) -> Value {
        if self.filter.is_none() && self.query.is_none() {
            return json!({ "match_all": {} });
        }

        let mut bool_query = json!({});
        if let Some(ref query) = self.query {
            bool_query["must"] = json!(query.conjuncts().iter().map(QueryNode::to_json).collect::<Vec<_>>());
        }
        if let Some(ref filter) = self.filter {
            bool_query["filter"] = json!(filter.conjuncts().iter().map(QueryNode::to_json).collect::<Vec<_>>());
        }

        json!({ "bool": bool_query })
    }

    /// Renders a complete search request body (`{"query": ...}`).
    pub fn search_body(&self) -> Value {
        json!({ "query": self.to_query_json() })
    }

    /// Consumes the context and returns `(filter, query)`.
    pub fn into_parts(self) -> (Option<QueryNode>, Option<QueryNode>) {
        (self.filter, self.query)
    }
}

impl<T: Document> fmt::Debug for QueryBuilderContext<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilderContext")
            .field("document", &std::any::type_name::<T>())
            .field("options", self.source.options())
            .field("filter", &self.filter)
            .field("query", &self.query)
            .finish()
    }
}
