//! Query builder pipeline.
//!
//! A [`QueryBuilder`] inspects the source query of a [`QueryBuilderContext`],
//! picks out the options it understands and ANDs the matching fragments into
//! the context. Builders are independent of one another; the
//! [`QueryBuilderPipeline`] simply runs every registered builder in priority
//! order against the same context.
//!
//! # Built-in Builders
//!
//! | Builder | Options | Fragment |
//! |---------|---------|----------|
//! | [`IdentityQueryBuilder`] | `ids`, `excluded_ids` | `terms(_id)`, `not(terms(_id))` |
//! | [`SoftDeletesQueryBuilder`] | `soft_delete_mode` | `term(is_deleted)` |
//! | [`DateRangeQueryBuilder`] | `date_range` | `range(field)` |
//! | [`FieldConditionsQueryBuilder`] | field conditions | `term`, `terms`, `exists`, `not` |

use async_trait::async_trait;

use crate::error::QueryResult;
use crate::query::Document;

mod context;
mod date_range;
mod field_conditions;
mod identity;
mod soft_deletes;

pub use context::QueryBuilderContext;
pub use date_range::{DateRange, DateRangeQueryBuilder, DateRangeQueryExt, DateRanges};
pub use field_conditions::{FieldConditionsQueryBuilder, build_condition_clause};
pub use identity::{ExcludedIds, IdentityQueryBuilder, IdentityQueryExt, Ids};
pub use soft_deletes::{
    SOFT_DELETE_FIELD, SoftDeleteMode, SoftDeleteModeKey, SoftDeletesQueryBuilder,
    SoftDeletesQueryExt,
};

/// Default priority of [`IdentityQueryBuilder`].
pub const IDENTITY_PRIORITY: i32 = 10;
/// Default priority of [`SoftDeletesQueryBuilder`].
pub const SOFT_DELETES_PRIORITY: i32 = 20;
/// Default priority of [`DateRangeQueryBuilder`].
pub const DATE_RANGE_PRIORITY: i32 = 30;
/// Default priority of [`FieldConditionsQueryBuilder`].
pub const FIELD_CONDITIONS_PRIORITY: i32 = 40;

/// A module translating some query options into Query DSL fragments.
///
/// Builders must only add to the context (via `and_filter` / `and_query`);
/// builders that do no I/O still use the async signature so that every
/// builder can be driven the same way.
#[async_trait]
pub trait QueryBuilder<T: Document>: Send + Sync {
    /// Name used in diagnostics and for unregistering.
    fn name(&self) -> &'static str;

    /// Adds this builder's fragments to the context.
    async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()>;
}

struct Registration<T: Document> {
    priority: i32,
    builder: Box<dyn QueryBuilder<T>>,
}

/// Ordered set of builders applied to every query for document type `T`.
pub struct QueryBuilderPipeline<T: Document> {
    registrations: Vec<Registration<T>>,
}

impl<T: Document> QueryBuilderPipeline<T> {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Creates a pipeline with every built-in builder at its default priority.
    pub fn with_default_builders() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(IdentityQueryBuilder, IDENTITY_PRIORITY);
        pipeline.register(SoftDeletesQueryBuilder, SOFT_DELETES_PRIORITY);
        pipeline.register(DateRangeQueryBuilder, DATE_RANGE_PRIORITY);
        pipeline.register(FieldConditionsQueryBuilder, FIELD_CONDITIONS_PRIORITY);
        pipeline
    }

    /// Registers a builder. Lower priorities run first; equal priorities run
    /// in registration order.
    pub fn register<B>(&mut self, builder: B, priority: i32) -> &mut Self
    where
        B: QueryBuilder<T> + 'static,
    {
        let position = self
            .registrations
            .iter()
            .position(|r| r.priority > priority)
            .unwrap_or(self.registrations.len());
        self.registrations.insert(
            position,
            Registration {
                priority,
                builder: Box::new(builder),
            },
        );
        self
    }

    /// Removes every builder with the given name. Returns true if any was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.builder.name() != name);
        self.registrations.len() != before
    }

    /// Names of the registered builders in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.registrations.iter().map(|r| r.builder.name()).collect()
    }

    /// Number of registered builders.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if no builder is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Runs every builder against `ctx`.
    ///
    /// Stops at the first failing builder; the context is then incomplete and
    /// must be discarded.
    pub async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        for registration in &self.registrations {
            tracing::trace!(
                builder = registration.builder.name(),
                priority = registration.priority,
                "Running query builder"
            );
            if let Err(e) = registration.builder.build(ctx).await {
                tracing::debug!(
                    builder = registration.builder.name(),
                    error = %e,
                    "Query builder failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

impl<T: Document> Default for QueryBuilderPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> std::fmt::Debug for QueryBuilderPipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilderPipeline")
            .field("builders", &self.names())
            .finish()
    }
}
