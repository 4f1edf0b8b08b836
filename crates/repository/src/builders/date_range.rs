//! Date range builder.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::dsl::QueryNode;
use crate::error::QueryResult;
use crate::options::OptionKey;
use crate::query::{Document, Field, IntoField, RepositoryQuery};

use super::{QueryBuilder, QueryBuilderContext};

/// An inclusive date range on one field. Either bound may be open.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    /// The date field.
    pub field: Field,
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

/// Option key for [`DateRange`]s.
pub struct DateRanges;

impl OptionKey for DateRanges {
    type Value = DateRange;
    const NAME: &'static str = "@DateRanges";
}

/// Restricts a query to date ranges.
pub trait DateRangeQueryExt: RepositoryQuery {
    /// Adds a range on `field`. Multiple ranges are ANDed.
    fn date_range<F>(
        mut self,
        field: F,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
    {
        self.options_mut().add::<DateRanges>(DateRange {
            field: field.into_field(),
            start,
            end,
        });
        self
    }
}

impl<Q: RepositoryQuery + ?Sized> DateRangeQueryExt for Q {}

/// Builder for [`DateRanges`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeQueryBuilder;

fn format_bound(bound: Option<DateTime<Utc>>) -> Option<Value> {
    bound.map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
}

#[async_trait]
impl<T: Document> QueryBuilder<T> for DateRangeQueryBuilder {
    fn name(&self) -> &'static str {
        "date_range"
    }

    async fn build(&self, ctx: &mut QueryBuilderContext<'_, T>) -> QueryResult<()> {
        for range in ctx.source().options().get_all::<DateRanges>() {
            // Fully open ranges match everything
            if range.start.is_none() && range.end.is_none() {
                continue;
            }

            let field = range.field.resolve()?;
            ctx.and_filter(QueryNode::range(
                field,
                format_bound(range.start),
                format_bound(range.end),
            ));
        }

        Ok(())
    }
}
