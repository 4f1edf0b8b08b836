//! Repository query objects and field references.
//!
//! A [`Query<T>`] is deliberately opaque: apart from its option bag it carries
//! nothing but the document type it targets. Everything a query can express is
//! attached through extension traits (see [`conditions`](crate::conditions)
//! and [`builders`](crate::builders)) and read back by the matching builder.
//!
//! Fields can be named two ways:
//!
//! - a literal path (`"data.company"`), accepted for any document type
//! - a [`FieldPath<T>`] constant declared against the document type, which
//!   only type-checks on queries targeting `T`
//!
//! Both resolve to the same [`Field`].

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{QueryError, QueryResult};
use crate::options::{OptionKey, QueryOptions};

/// A document type that repository queries can target.
pub trait Document: 'static {
    /// Whether documents of this type carry an `is_deleted` flag.
    const SUPPORTS_SOFT_DELETES: bool = false;
}

/// Dynamic documents: queries without a statically known schema.
impl Document for serde_json::Value {}

/// A query object that carries an option bag.
pub trait RepositoryQuery {
    /// The document type the query targets.
    type Document: Document;

    /// Returns the option bag.
    fn options(&self) -> &QueryOptions;

    /// Returns the option bag for mutation.
    fn options_mut(&mut self) -> &mut QueryOptions;

    /// Appends an option value and returns the query for chaining.
    fn add_option<K: OptionKey>(mut self, value: K::Value) -> Self
    where
        Self: Sized,
    {
        self.options_mut().add::<K>(value);
        self
    }
}

/// The standard repository query for documents of type `T`.
pub struct Query<T> {
    options: QueryOptions,
    _document: PhantomData<fn() -> T>,
}

impl<T: Document> Query<T> {
    /// Creates a query with no options.
    pub fn new() -> Self {
        Self {
            options: QueryOptions::new(),
            _document: PhantomData,
        }
    }
}

impl<T: Document> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("document", &std::any::type_name::<T>())
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Document> RepositoryQuery for Query<T> {
    type Document = T;

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }
}

/// A literal field path (e.g. `"data.company"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field(Cow<'static, str>);

impl Field {
    /// Creates a field from a path.
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    /// Creates a field from a static path without allocating.
    pub const fn from_static(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Returns the raw path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the field to a path usable in a query fragment.
    ///
    /// Fails for empty paths, for paths with empty segments (`"a..b"`,
    /// `".a"`, `"a."`) and for paths with surrounding whitespace.
    pub fn resolve(&self) -> QueryResult<&str> {
        let path: &str = &self.0;
        if path.trim().is_empty() {
            return Err(QueryError::InvalidField {
                field: self.0.to_string(),
                message: "field path is empty".to_string(),
            });
        }
        if path.trim() != path {
            return Err(QueryError::InvalidField {
                field: self.0.to_string(),
                message: "field path has surrounding whitespace".to_string(),
            });
        }
        if path.split('.').any(str::is_empty) {
            return Err(QueryError::InvalidField {
                field: self.0.to_string(),
                message: "field path contains an empty segment".to_string(),
            });
        }
        Ok(path)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Field {
    fn from(path: &str) -> Self {
        Self(Cow::Owned(path.to_string()))
    }
}

impl From<String> for Field {
    fn from(path: String) -> Self {
        Self(Cow::Owned(path))
    }
}

/// A field path declared against document type `T`.
///
/// Document types expose their searchable fields as constants:
///
/// ```
/// use helios_repository::query::{Document, FieldPath};
///
/// struct Ticket;
///
/// impl Document for Ticket {}
///
/// impl Ticket {
///     pub const STATUS: FieldPath<Ticket> = FieldPath::new("status");
///     pub const REPORTER: FieldPath<Ticket> = FieldPath::new("reporter");
/// }
///
/// assert_eq!(Ticket::REPORTER.join("email").as_str(), "reporter.email");
/// ```
pub struct FieldPath<T> {
    path: Cow<'static, str>,
    _document: PhantomData<fn() -> T>,
}

impl<T> FieldPath<T> {
    /// Declares a path constant.
    pub const fn new(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            _document: PhantomData,
        }
    }

    /// Appends a child segment (`parent.child`).
    pub fn join(&self, child: &str) -> Self {
        Self {
            path: Cow::Owned(format!("{}.{}", self.path, child)),
            _document: PhantomData,
        }
    }

    /// The `keyword` multi-field of a text property.
    pub fn keyword(&self) -> Self {
        self.join("keyword")
    }

    /// Returns the literal path.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Converts to an untyped [`Field`].
    pub fn to_field(&self) -> Field {
        Field(self.path.clone())
    }
}

impl<T> Clone for FieldPath<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _document: PhantomData,
        }
    }
}

impl<T> PartialEq for FieldPath<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for FieldPath<T> {}

impl<T> fmt::Debug for FieldPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPath").field(&self.path).finish()
    }
}

impl<T> From<FieldPath<T>> for Field {
    fn from(path: FieldPath<T>) -> Self {
        Field(path.path)
    }
}

/// Conversion into a [`Field`] for queries targeting document type `T`.
///
/// Literal paths convert for every `T`; [`FieldPath<T>`] only for its own `T`.
pub trait IntoField<T> {
    /// Performs the conversion.
    fn into_field(self) -> Field;
}

impl<T> IntoField<T> for Field {
    fn into_field(self) -> Field {
        self
    }
}

impl<T> IntoField<T> for &Field {
    fn into_field(self) -> Field {
        self.clone()
    }
}

impl<T> IntoField<T> for &str {
    fn into_field(self) -> Field {
        Field::from(self)
    }
}

impl<T> IntoField<T> for String {
    fn into_field(self) -> Field {
        Field::from(self)
    }
}

impl<T> IntoField<T> for FieldPath<T> {
    fn into_field(self) -> Field {
        self.into()
    }
}

impl<T> IntoField<T> for &FieldPath<T> {
    fn into_field(self) -> Field {
        self.to_field()
    }
}
