use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::models::Task;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProcessingError {
    #[error("{0}")]
    Failed(String),
    #[error("timed out after {hours:.1} hours")]
    TimedOut { hours: f64 },
    /// The processor could not be reached. The task is left in progress
    /// and the tick is aborted rather than failing the task.
    #[error("processor unavailable: {0}")]
    Unavailable(String),
}

/// Advances an in-progress task by one tick.
///
/// Implementations must not block: work is simulated, and a tick applies
/// every transition synchronously. Returns the adjusted completion
/// percentage; `>= 100.0` completes the task, `Err` fails it, except
/// [`ProcessingError::Unavailable`], which aborts the tick.
pub trait TaskProcessor: Send + Sync {
    fn process(&self, task: &Task, now: DateTime<Utc>) -> Result<f64, ProcessingError>;
}
