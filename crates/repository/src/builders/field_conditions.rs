//! Field condition query builder.
//!
//! Translates attached [`FieldCondition`]s into filter fragments:
//!
//! | Operator | Fragment |
//! |----------|----------|
//! | `Equals` | `term(field, value)`, or `terms(field, values)` for a list |
//! | `NotEquals` | `must_not` around the `Equals` fragment |
//! | `IsEmpty` | `must_not(exists(field))` |
//! | `HasValue` | `exists(field)` |
//!
//! Conditions are always conjunctive and are applied in attachment order.

use async_trait::async_trait;
use serde_json::Value;

use crate::conditions::{ComparisonOperator, FieldCondition, FieldConditionQueryExt};
use crate::dsl::QueryNode;
use crate::error::QueryResult;
use crate::query::Document;

use super::{QueryBuilder, QueryBuilderContext};

/// Builder for field conditions.
///
/// Running it twice on the same context adds every fragment twice; the
/// pipeline runs it once per build.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldConditionsQueryBuilder;

impl FieldConditionsQueryBuilder {
    /// Synchronous body of [`QueryBuilder::build`].
    pub fn apply<T: Document>(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        let conditions = ctx.source().field_conditions();
        if conditions.is_empty() {
            return Ok(());
        }

        for condition in conditions {
            ctx.and_filter(build_condition_clause(condition)?);
        }

        Ok(())
    }
}

#[async_trait]
impl<T: Document> QueryBuilder<T> for FieldConditionsQueryBuilder {
    fn name(&self) -> &'static str {
        "field_conditions"
    }

    async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        self.apply(ctx)
    }
}

/// Builds the fragment for a single condition.
///
/// Fails only when the field cannot be resolved to a path.
pub fn build_condition_clause(condition: &FieldCondition) -> QueryResult<QueryNode> {
    let field = condition.field.resolve()?;

    let clause = match condition.operator {
        ComparisonOperator::Equals => value_clause(field, condition.value.as_ref()),
        ComparisonOperator::NotEquals => !value_clause(field, condition.value.as_ref()),
        ComparisonOperator::IsEmpty => !QueryNode::exists(field),
        ComparisonOperator::HasValue => QueryNode::exists(field),
    };

    Ok(clause)
}

/// `terms` for list values, `term` for everything else (strings included).
/// A missing value is passed through as `null`.
fn value_clause(field: &str, value: Option<&Value>) -> QueryNode {
    match value {
        Some(Value::Array(values)) => QueryNode::terms(field, values.iter().cloned()),
        Some(value) => QueryNode::term(field, value.clone()),
        None => QueryNode::term(field, Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use serde_json::json;

    fn filter_json(query: &Query<Value>) -> Option<Value> {
        let mut ctx = QueryBuilderContext::new(query);
        FieldConditionsQueryBuilder.apply(&mut ctx).unwrap();
        ctx.filter().map(QueryNode::to_json)
    }

    #[test]
    fn test_equals_scalar_is_term() {
        let query = Query::<Value>::new().field_equals("status", "x");
        assert_eq!(
            filter_json(&query),
            Some(json!({ "term": { "status": "x" } }))
        );
    }

    #[test]
    fn test_equals_list_is_terms() {
        let query = Query::<Value>::new().field_equals("status", vec!["x", "y"]);
        assert_eq!(
            filter_json(&query),
            Some(json!({ "terms": { "status": ["x", "y"] } }))
        );
    }

    #[test]
    fn test_equals_string_is_not_split() {
        let query = Query::<Value>::new().field_equals("code", "abc");
        assert_eq!(
            filter_json(&query),
            Some(json!({ "term": { "code": "abc" } }))
        );
    }

    #[test]
    fn test_not_equals_negates() {
        let query = Query::<Value>::new().field_not_equals("status", "x");
        assert_eq!(
            filter_json(&query),
            Some(json!({ "bool": { "must_not": [{ "term": { "status": "x" } }] } }))
        );

        let query = Query::<Value>::new().field_not_equals("status", vec![1, 2]);
        assert_eq!(
            filter_json(&query),
            Some(json!({ "bool": { "must_not": [{ "terms": { "status": [1, 2] } }] } }))
        );
    }

    #[test]
    fn test_is_empty_and_has_value() {
        let empty = build_condition_clause(&FieldCondition::new(
            "email",
            ComparisonOperator::IsEmpty,
            None,
        ))
        .unwrap();
        assert_eq!(empty, !QueryNode::exists("email"));

        let has_value = build_condition_clause(&FieldCondition::new(
            "email",
            ComparisonOperator::HasValue,
            Some(json!("ignored")),
        ))
        .unwrap();
        assert_eq!(has_value, QueryNode::exists("email"));
    }

    #[test]
    fn test_null_value_passes_through() {
        let clause = build_condition_clause(&FieldCondition::new(
            "owner",
            ComparisonOperator::NotEquals,
            None,
        ))
        .unwrap();
        assert_eq!(clause, !QueryNode::term("owner", Value::Null));
    }

    #[test]
    fn test_empty_bag_is_noop() {
        let query = Query::<Value>::new();
        assert_eq!(filter_json(&query), None);
    }

    #[test]
    fn test_invalid_field_fails_build() {
        let query = Query::<Value>::new()
            .field_equals("status", "x")
            .field_has_value("");

        let mut ctx = QueryBuilderContext::new(&query);
        let result = FieldConditionsQueryBuilder.apply(&mut ctx);
        assert!(result.is_err());
    }
}
