//! Error types for the repository query layer.
//!
//! Query construction failures abort the build they occur in. Backend errors
//! only surface from client construction; mapping resolution itself never
//! returns an error.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for repository operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Query construction errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Backend/client errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while turning a query object into a Query DSL tree.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A field reference could not be resolved to a usable path.
    #[error("invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// A fragment could not be rendered.
    #[error("query serialization failed: {message}")]
    Serialization { message: String },

    /// A builder rejected the options it was given.
    #[error("query builder '{builder}' failed: {message}")]
    BuilderFailed { builder: String, message: String },
}

/// Errors originating from the search engine client.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend could not be configured or established.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for query construction.
pub type QueryResult<T> = Result<T, QueryError>;

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Serialization {
            message: err.to_string(),
        }
    }
}
