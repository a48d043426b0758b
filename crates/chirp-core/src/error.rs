//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Post is too long: {length} characters (max {max})")]
    PostTooLong { length: usize, max: usize },

    #[error("User {0} cannot follow themselves")]
    SelfFollow(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// True for errors raised before any durable mutation took place.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::PostTooLong { .. } | DomainError::SelfFollow(_)
        )
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Malformed record: {0}")]
    Decode(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => DomainError::StoreUnavailable(msg),
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "record",
                id: String::new(),
            },
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::Query(msg) => DomainError::Internal(msg),
            RepoError::Decode(msg) => DomainError::Internal(format!("decode: {msg}")),
        }
    }
}
