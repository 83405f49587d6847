//! Domain errors for the custodian maintenance core.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the custodian system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Duplicate task: {0}")]
    DuplicateTask(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Command failed: {program}: {detail}")]
    CommandFailed { program: String, detail: String },

    #[error("Command timed out: {program} after {timeout_ms}ms")]
    CommandTimeout { program: String, timeout_ms: u64 },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Merge failed: {0}")]
    MergeFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::MergeFailed(err.to_string())
    }
}
