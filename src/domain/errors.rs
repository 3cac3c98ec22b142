//! Domain errors for the Lynx orchestrator.

use thiserror::Error;

use crate::domain::models::{TaskCategory, TaskId, TaskStatus};

/// Domain-level errors that can occur in the orchestrator.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Invalid state transition for {id} from {from} to {to}")]
    InvalidStateTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("Dependency task {0} not found")]
    UnknownDependency(TaskId),

    #[error("Dependency task {0} listed more than once")]
    DuplicateDependency(TaskId),

    #[error("No agent is enabled for {0} tasks")]
    CategoryDisabled(TaskCategory),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Task processor unavailable: {0}")]
    ProcessorUnavailable(String),

    #[error("Could not allocate a unique task id after {attempts} attempts")]
    IdCollision { attempts: u32 },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Submission errors are the caller's fault and are surfaced synchronously.
    pub fn is_submission_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDependency(_)
                | Self::DuplicateDependency(_)
                | Self::CategoryDisabled(_)
                | Self::ValidationFailed(_)
        )
    }
}
