//! Helios Repository Query Layer
//!
//! This crate translates abstract, type-safe repository queries into the
//! Elasticsearch Query DSL. It is the composition layer between application
//! code that describes *what* it wants to find and the boolean query trees the
//! search engine understands.
//!
//! # Architecture
//!
//! - [`options`] - Typed option bag attached to every query object
//! - [`query`] - The [`RepositoryQuery`](query::RepositoryQuery) trait, the
//!   concrete [`Query`](query::Query) type and field references
//! - [`conditions`] - Field conditions (equals, not-equals, has-value, is-empty)
//! - [`dsl`] - The boolean filter tree emitted by query builders
//! - [`builders`] - The query builder pipeline and its builders
//! - [`mapping`] - Field mapping descriptors and remote mapping resolution
//! - [`backends`] - Search engine client bindings (feature gated)
//! - [`error`] - Error types for all operations
//!
//! # Features
//!
//! - `elasticsearch` - [`ElasticsearchMappingClient`](backends::elasticsearch::ElasticsearchMappingClient)
//!   backed by the official `elasticsearch` crate
//! - `cli` - the `mapping-inspect` binary
//!
//! # Quick Start
//!
//! ```
//! use helios_repository::builders::{QueryBuilderContext, QueryBuilderPipeline};
//! use helios_repository::conditions::FieldConditionQueryExt;
//! use helios_repository::query::Query;
//! use serde_json::{Value, json};
//!
//! let query = Query::<Value>::new()
//!     .field_equals("status", "open")
//!     .field_has_value("assignee");
//!
//! let pipeline = QueryBuilderPipeline::<Value>::with_default_builders();
//! let mut ctx = QueryBuilderContext::new(&query);
//! tokio_test::block_on(pipeline.build(&mut ctx)).unwrap();
//!
//! assert_eq!(
//!     ctx.filter().unwrap().to_json(),
//!     json!({ "bool": { "must": [
//!         { "term": { "status": "open" } },
//!         { "exists": { "field": "assignee" } }
//!     ] } })
//! );
//! ```
//!
//! # Custom Conditions
//!
//! Any code can attach its own typed options to a query and ship a builder
//! that understands them. The query object never needs to know about either:
//!
//! ```
//! use async_trait::async_trait;
//! use helios_repository::builders::{QueryBuilder, QueryBuilderContext};
//! use helios_repository::dsl::QueryNode;
//! use helios_repository::error::{QueryError, QueryResult};
//! use helios_repository::options::OptionKey;
//! use helios_repository::query::{Document, RepositoryQuery};
//! use serde_json::Value;
//!
//! struct Companies;
//!
//! impl OptionKey for Companies {
//!     type Value = String;
//!     const NAME: &'static str = "@Companies";
//! }
//!
//! struct CompanyQueryBuilder;
//!
//! #[async_trait]
//! impl<T: Document> QueryBuilder<T> for CompanyQueryBuilder {
//!     fn name(&self) -> &'static str {
//!         "company"
//!     }
//!
//!     async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
//!         let companies = ctx.source().options().get_all::<Companies>();
//!         if companies.iter().any(|c| c.is_empty()) {
//!             return Err(QueryError::BuilderFailed {
//!                 builder: "company".to_string(),
//!                 message: "empty company id".to_string(),
//!             });
//!         }
//!         if !companies.is_empty() {
//!             ctx.and_filter(QueryNode::terms("company", companies.iter().map(|c| Value::from(c.as_str()))));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod builders;
pub mod conditions;
pub mod dsl;
pub mod error;
pub mod mapping;
pub mod options;
pub mod query;
