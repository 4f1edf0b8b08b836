//! Field conditions.
//!
//! A field condition is a single `(field, operator, value)` predicate attached
//! to a query and later translated by
//! [`FieldConditionsQueryBuilder`](crate::builders::FieldConditionsQueryBuilder).
//!
//! ```
//! use helios_repository::conditions::{ComparisonOperator, FieldConditionQueryExt};
//! use helios_repository::query::Query;
//! use serde_json::{Value, json};
//!
//! let query = Query::<Value>::new()
//!     .field_equals("status", "open")
//!     .field_not_equals("priority", vec!["low", "none"])
//!     .field_empty("closed_at");
//!
//! let conditions = query.field_conditions();
//! assert_eq!(conditions.len(), 3);
//! assert_eq!(conditions[1].operator, ComparisonOperator::NotEquals);
//! assert_eq!(conditions[1].value, Some(json!(["low", "none"])));
//! ```

use std::fmt;

use serde_json::Value;

use crate::options::OptionKey;
use crate::query::{Field, IntoField, RepositoryQuery};

/// Comparison semantics of a [`FieldCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Field equals the value (or one of the values).
    Equals,
    /// Field equals neither the value nor any of the values.
    NotEquals,
    /// Field is absent or null.
    IsEmpty,
    /// Field is present and non-null.
    HasValue,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Equals => write!(f, "equals"),
            ComparisonOperator::NotEquals => write!(f, "not-equals"),
            ComparisonOperator::IsEmpty => write!(f, "is-empty"),
            ComparisonOperator::HasValue => write!(f, "has-value"),
        }
    }
}

/// A single field predicate awaiting translation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    /// The field the predicate applies to.
    pub field: Field,
    /// The comparison value. Ignored by `IsEmpty` and `HasValue`.
    pub value: Option<Value>,
    /// The comparison semantics.
    pub operator: ComparisonOperator,
}

impl FieldCondition {
    /// Creates a condition.
    pub fn new(field: impl Into<Field>, operator: ComparisonOperator, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            value,
            operator,
        }
    }
}

/// Option key under which field conditions are stored.
pub struct FieldConditions;

impl OptionKey for FieldConditions {
    type Value = FieldCondition;
    const NAME: &'static str = "@FieldConditionsKey";
}

/// Attaches and reads field conditions on any repository query.
///
/// Each operator accepts a literal path (`"status"`) or a
/// [`FieldPath`](crate::query::FieldPath) declared against the query's
/// document type.
pub trait FieldConditionQueryExt: RepositoryQuery {
    /// Attaches a condition with an explicit operator.
    fn field_condition<F>(mut self, field: F, operator: ComparisonOperator, value: Option<Value>) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
    {
        self.options_mut()
            .add::<FieldConditions>(FieldCondition::new(field.into_field(), operator, value));
        self
    }

    /// Field equals `value`; a list value matches any of its elements.
    fn field_equals<F, V>(self, field: F, value: V) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
        V: Into<Value>,
    {
        self.field_condition(field, ComparisonOperator::Equals, Some(value.into()))
    }

    /// Field equals neither `value` nor, for a list, any of its elements.
    fn field_not_equals<F, V>(self, field: F, value: V) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
        V: Into<Value>,
    {
        self.field_condition(field, ComparisonOperator::NotEquals, Some(value.into()))
    }

    /// Field is present and non-null.
    fn field_has_value<F>(self, field: F) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
    {
        self.field_condition(field, ComparisonOperator::HasValue, None)
    }

    /// Field is absent or null.
    fn field_empty<F>(self, field: F) -> Self
    where
        Self: Sized,
        F: IntoField<Self::Document>,
    {
        self.field_condition(field, ComparisonOperator::IsEmpty, None)
    }

    /// Returns the attached conditions in insertion order.
    fn field_conditions(&self) -> &[FieldCondition] {
        self.options().get_all::<FieldConditions>()
    }
}

impl<Q: RepositoryQuery + ?Sized> FieldConditionQueryExt for Q {}
