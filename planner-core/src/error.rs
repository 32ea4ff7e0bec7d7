//! Error types for the planner.

use thiserror::Error;

/// Errors that can occur in planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A required field was empty, or a value had the wrong shape.
    #[error("{0}")]
    Validation(String),

    /// Reference to a date bucket, task or note that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote service rejected the session.
    #[error("Unauthorized")]
    Authentication,

    /// Persisted data could not be written, or the backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PlannerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PlannerError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        PlannerError::NotFound(what.into())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Serialization(e.to_string())
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
