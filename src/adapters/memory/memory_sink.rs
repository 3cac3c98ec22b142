use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::{SystemEvent, SystemEventKind, Task, TaskId};
use crate::domain::ports::{PersistenceSink, SinkError};

/// Keeps the latest record of every task plus the full event log.
///
/// Backs `lynx run --in-memory` and tests that inspect what was written
/// through.
#[derive(Debug, Default)]
pub struct InMemorySink {
    tasks: RwLock<HashMap<TaskId, Task>>,
    events: RwLock<Vec<SystemEvent>>,
    task_writes: RwLock<u64>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Number of upserts received, including repeated writes of one task.
    pub async fn task_writes(&self) -> u64 {
        *self.task_writes.read().await
    }

    pub async fn events(&self) -> Vec<SystemEvent> {
        self.events.read().await.clone()
    }

    pub async fn event_kinds(&self) -> Vec<SystemEventKind> {
        self.events.read().await.iter().map(|e| e.kind).collect()
    }
}

#[async_trait]
impl PersistenceSink for InMemorySink {
    async fn persist_task(&self, task: &Task) -> Result<(), SinkError> {
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        *self.task_writes.write().await += 1;
        Ok(())
    }

    async fn persist_event(&self, event: &SystemEvent) -> Result<(), SinkError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }
}
