use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{SystemEvent, Task};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Port for the external record store tasks and events are written through to.
///
/// Writes are write-through, not write-ahead: a failed write never rolls
/// back the in-memory transition that produced it.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Upsert the full task record by id.
    async fn persist_task(&self, task: &Task) -> Result<(), SinkError>;

    /// Append a system event.
    async fn persist_event(&self, event: &SystemEvent) -> Result<(), SinkError>;
}
