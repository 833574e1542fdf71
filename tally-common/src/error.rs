//! Error types for Tally

use thiserror::Error;

/// Common error type for Tally operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any write happened
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the entity's current lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unrecognized selector or parameter value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller's role does not permit the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the common Error
pub type Result<T> = std::result::Result<T, Error>;
