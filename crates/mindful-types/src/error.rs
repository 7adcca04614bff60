use thiserror::Error;

/// Errors from repository operations (used by trait definitions in mindful-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors related to forum operations.
#[derive(Debug, Error)]
pub enum ForumError {
    #[error("{0}")]
    Validation(String),

    #[error("post not found")]
    PostNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
