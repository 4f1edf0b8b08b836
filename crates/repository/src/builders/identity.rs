//! Document identity builder.

use async_trait::async_trait;
use serde_json::Value;

use crate::dsl::QueryNode;
use crate::error::QueryResult;
use crate::options::OptionKey;
use crate::query::{Document, RepositoryQuery};

use super::{QueryBuilder, QueryBuilderContext};

/// Option key for document ids to include.
pub struct Ids;

impl OptionKey for Ids {
    type Value = String;
    const NAME: &'static str = "@Ids";
}

/// Option key for document ids to exclude.
pub struct ExcludedIds;

impl OptionKey for ExcludedIds {
    type Value = String;
    const NAME: &'static str = "@ExcludedIds";
}

/// Restricts a query to (or away from) specific document ids.
pub trait IdentityQueryExt: RepositoryQuery {
    /// Only match the given id. May be called repeatedly.
    fn id(mut self, id: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().add::<Ids>(id.into());
        self
    }

    /// Only match the given ids.
    fn ids<I, S>(mut self, ids: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options_mut()
            .extend::<Ids, _>(ids.into_iter().map(Into::into));
        self
    }

    /// Never match the given id.
    fn excluded_id(mut self, id: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().add::<ExcludedIds>(id.into());
        self
    }

    /// Never match the given ids.
    fn excluded_ids<I, S>(mut self, ids: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options_mut()
            .extend::<ExcludedIds, _>(ids.into_iter().map(Into::into));
        self
    }
}

impl<Q: RepositoryQuery + ?Sized> IdentityQueryExt for Q {}

/// Builder for [`Ids`] and [`ExcludedIds`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityQueryBuilder;

fn id_clause(ids: &[String]) -> QueryNode {
    match ids {
        [id] => QueryNode::term("_id", id.as_str()),
        ids => QueryNode::terms("_id", ids.iter().map(|id| Value::from(id.as_str()))),
    }
}

#[async_trait]
impl<T: Document> QueryBuilder<T> for IdentityQueryBuilder {
    fn name(&self) -> &'static str {
        "identity"
    }

    async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        let options = ctx.source().options();

        let ids = options.get_all::<Ids>();
        if !ids.is_empty() {
            ctx.and_filter(id_clause(ids));
        }

        let excluded = options.get_all::<ExcludedIds>();
        if !excluded.is_empty() {
            ctx.and_filter(!id_clause(excluded));
        }

        Ok(())
    }
}
