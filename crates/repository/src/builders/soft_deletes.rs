//! Soft-delete filtering for document types that declare an `is_deleted` flag.

use async_trait::async_trait;

use crate::dsl::QueryNode;
use crate::error::QueryResult;
use crate::options::OptionKey;
use crate::query::{Document, RepositoryQuery};

use super::{QueryBuilder, QueryBuilderContext};

/// Field holding the soft-delete flag.
pub const SOFT_DELETE_FIELD: &str = "is_deleted";

/// Which documents a query sees with respect to soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoftDeleteMode {
    /// Only documents that are not deleted.
    #[default]
    ActiveOnly,
    /// Only deleted documents.
    DeletedOnly,
    /// Both.
    All,
}

/// Option key for [`SoftDeleteMode`]; the last value wins.
pub struct SoftDeleteModeKey;

impl OptionKey for SoftDeleteModeKey {
    type Value = SoftDeleteMode;
    const NAME: &'static str = "@SoftDeleteMode";
}

/// Selects the soft-delete mode of a query.
pub trait SoftDeletesQueryExt: RepositoryQuery {
    /// Sets the mode. Defaults to [`SoftDeleteMode::ActiveOnly`].
    fn soft_delete_mode(mut self, mode: SoftDeleteMode) -> Self
    where
        Self: Sized,
    {
        self.options_mut().add::<SoftDeleteModeKey>(mode);
        self
    }

    /// Returns the effective mode.
    fn get_soft_delete_mode(&self) -> SoftDeleteMode {
        self.options()
            .get_last::<SoftDeleteModeKey>()
            .copied()
            .unwrap_or_default()
    }
}

impl<Q: RepositoryQuery + ?Sized> SoftDeletesQueryExt for Q {}

/// Builder adding `term(is_deleted, ..)` for documents with
/// [`Document::SUPPORTS_SOFT_DELETES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftDeletesQueryBuilder;

#[async_trait]
impl<T: Document> QueryBuilder<T> for SoftDeletesQueryBuilder {
    fn name(&self) -> &'static str {
        "soft_deletes"
    }

    async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        if !T::SUPPORTS_SOFT_DELETES {
            return Ok(());
        }

        match ctx.source().get_soft_delete_mode() {
            SoftDeleteMode::ActiveOnly => ctx.and_filter(QueryNode::term(SOFT_DELETE_FIELD, false)),
            SoftDeleteMode::DeletedOnly => ctx.and_filter(QueryNode::term(SOFT_DELETE_FIELD, true)),
            SoftDeleteMode::All => {}
        }

        Ok(())
    }
}
