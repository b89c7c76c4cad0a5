//! Domain-level error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    /// Missing row, or a row owned by somebody else.
    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// The user-triggered operations of the editor and the post list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    Save,
    Refresh,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Generate => "generate",
            Operation::Save => "save",
            Operation::Refresh => "refresh",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Failure of an editor or collection operation.
///
/// Raised at the operation boundary; local state is left exactly as it was
/// before the call.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("You must be logged in to continue")]
    AuthRequired,

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Unable to save post: {0}")]
    Persist(String),

    #[error("Unable to load posts: {0}")]
    Fetch(String),

    #[error("Unable to delete post: {0}")]
    Delete(String),

    #[error("A {0} is already in progress")]
    Busy(Operation),
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => SessionError::Validation(msg),
            DomainError::Unauthorized => SessionError::AuthRequired,
            other => SessionError::Persist(other.to_string()),
        }
    }
}
