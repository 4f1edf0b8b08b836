//! Integration tests for field conditions and the field conditions builder.

mod common;

use common::LogEvent;
use helios_repository::builders::{
    FieldConditionsQueryBuilder, QueryBuilder, QueryBuilderContext,
};
use helios_repository::conditions::{ComparisonOperator, FieldConditionQueryExt, FieldConditions};
use helios_repository::dsl::QueryNode;
use helios_repository::error::QueryError;
use helios_repository::options::OptionKey;
use helios_repository::query::{Query, RepositoryQuery};
use serde_json::{Value, json};

async fn build_filter(query: &Query<LogEvent>) -> Option<QueryNode> {
    let mut ctx = QueryBuilderContext::new(query);
    FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap();
    ctx.filter().cloned()
}

// ============================================================================
// Option bag
// ============================================================================

struct Tags;

impl OptionKey for Tags {
    type Value = String;
    const NAME: &'static str = "@Tags";
}

#[test]
fn test_options_keep_insertion_order() {
    let query = Query::<LogEvent>::new()
        .add_option::<Tags>("b".to_string())
        .add_option::<Tags>("a".to_string())
        .add_option::<Tags>("c".to_string());

    assert_eq!(query.options().get_all::<Tags>(), ["b", "a", "c"]);
    assert!(query.options().get_all::<FieldConditions>().is_empty());
}

#[test]
fn test_conditions_are_appended_under_one_key() {
    let query = Query::<LogEvent>::new()
        .field_equals(LogEvent::COMPANY, "acme")
        .field_has_value("message")
        .field_empty(LogEvent::DATA.join("user"));

    let conditions = query.field_conditions();
    assert_eq!(conditions.len(), 3);
    assert_eq!(conditions[0].operator, ComparisonOperator::Equals);
    assert_eq!(conditions[1].operator, ComparisonOperator::HasValue);
    assert_eq!(conditions[2].field.as_str(), "data.user");
    assert_eq!(query.options().key_names(), vec!["@FieldConditionsKey"]);
}

// ============================================================================
// Fragments
// ============================================================================

#[tokio::test]
async fn test_equals_scalar_is_term() {
    let query = Query::<LogEvent>::new().field_equals("company", "x");
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(filter.to_json(), json!({ "term": { "company": "x" } }));
}

#[tokio::test]
async fn test_equals_list_is_terms() {
    let query = Query::<LogEvent>::new().field_equals("company", vec!["x", "y"]);
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(filter.to_json(), json!({ "terms": { "company": ["x", "y"] } }));
}

#[tokio::test]
async fn test_string_value_is_not_split() {
    let query = Query::<LogEvent>::new().field_equals("company", "x,y");
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(filter, QueryNode::term("company", "x,y"));
}

#[tokio::test]
async fn test_not_equals_negates_term() {
    let query = Query::<LogEvent>::new().field_not_equals("company", "x");
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(
        filter.to_json(),
        json!({ "bool": { "must_not": [{ "term": { "company": "x" } }] } })
    );
}

#[tokio::test]
async fn test_not_equals_list_negates_terms() {
    let query = Query::<LogEvent>::new().field_not_equals("company", vec!["x", "y"]);
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(filter, !QueryNode::terms("company", [json!("x"), json!("y")]));
}

#[tokio::test]
async fn test_is_empty_and_has_value() {
    let query = Query::<LogEvent>::new().field_empty("message");
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(
        filter.to_json(),
        json!({ "bool": { "must_not": [{ "exists": { "field": "message" } }] } })
    );

    let query = Query::<LogEvent>::new().field_has_value("message");
    let filter = build_filter(&query).await.unwrap();
    assert_eq!(filter.to_json(), json!({ "exists": { "field": "message" } }));
}

#[tokio::test]
async fn test_null_value_passes_through() {
    let query = Query::<LogEvent>::new()
        .field_condition("company", ComparisonOperator::Equals, None)
        .field_condition("message", ComparisonOperator::NotEquals, Some(Value::Null));
    let filter = build_filter(&query).await.unwrap();

    assert_eq!(
        filter.conjuncts(),
        [
            QueryNode::term("company", Value::Null),
            !QueryNode::term("message", Value::Null),
        ]
    );
}

#[tokio::test]
async fn test_typed_and_literal_paths_are_equivalent() {
    let typed = Query::<LogEvent>::new()
        .field_equals(LogEvent::ID, "1")
        .field_not_equals(LogEvent::COMPANY, "acme")
        .field_has_value(LogEvent::MESSAGE)
        .field_empty(LogEvent::CREATED_UTC);
    let literal = Query::<LogEvent>::new()
        .field_equals("id", "1")
        .field_not_equals("company", "acme")
        .field_has_value("message")
        .field_empty("created_utc");

    assert_eq!(typed.field_conditions(), literal.field_conditions());
    assert_eq!(build_filter(&typed).await, build_filter(&literal).await);
}

#[tokio::test]
async fn test_conditions_are_anded_in_order() {
    let query = Query::<LogEvent>::new()
        .field_equals("a", 1)
        .field_has_value("b");
    let filter = build_filter(&query).await.unwrap();

    assert_eq!(
        filter.to_json(),
        json!({ "bool": { "must": [
            { "term": { "a": 1 } },
            { "exists": { "field": "b" } }
        ] } })
    );
}

// ============================================================================
// Builder behavior
// ============================================================================

#[tokio::test]
async fn test_empty_bag_leaves_context_untouched() {
    let query = Query::<LogEvent>::new();
    let mut ctx = QueryBuilderContext::new(&query);
    FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap();

    assert!(ctx.filter().is_none());
    assert!(ctx.query().is_none());
}

#[tokio::test]
async fn test_running_twice_duplicates_fragments() {
    let query = Query::<LogEvent>::new()
        .field_equals("a", 1)
        .field_has_value("b");
    let mut ctx = QueryBuilderContext::new(&query);
    FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap();
    FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap();

    assert_eq!(
        ctx.filter().unwrap().conjuncts(),
        [
            QueryNode::term("a", 1),
            QueryNode::exists("b"),
            QueryNode::term("a", 1),
            QueryNode::exists("b"),
        ]
    );
}

#[tokio::test]
async fn test_invalid_field_aborts_build() {
    let query = Query::<LogEvent>::new()
        .field_equals("company", "acme")
        .field_has_value("data..user");
    let mut ctx = QueryBuilderContext::new(&query);
    let err = FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap_err();

    assert!(matches!(err, QueryError::InvalidField { ref field, .. } if field == "data..user"));
}

#[tokio::test]
async fn test_padded_field_is_rejected_not_trimmed() {
    let query = Query::<LogEvent>::new().field_equals(" status ", "open");
    let mut ctx = QueryBuilderContext::new(&query);
    let err = FieldConditionsQueryBuilder.build(&mut ctx).await.unwrap_err();

    assert!(matches!(err, QueryError::InvalidField { ref field, .. } if field == " status "));
    assert!(ctx.filter().is_none());
}
