//! Asynchronous write-through to the persistence sink.
//!
//! The scheduler never awaits a sink. Records are pushed onto an unbounded
//! channel and written by a background drain task in submission order.
//! Sink failures are logged and dropped; they never touch scheduler state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::models::{SystemEvent, SystemEventKind, Task};
use crate::domain::ports::PersistenceSink;

#[derive(Debug)]
enum PersistRecord {
    Task(Box<Task>),
    Event(SystemEvent),
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle for enqueueing writes.
#[derive(Debug, Clone)]
pub struct PersistenceQueue {
    tx: mpsc::UnboundedSender<PersistRecord>,
}

impl PersistenceQueue {
    /// Start the drain task. It runs until every handle is dropped.
    pub fn spawn(sink: Arc<dyn PersistenceSink>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(drain(sink, rx));
        (Self { tx }, handle)
    }

    /// Queue an upsert of the task's current state.
    pub fn task(&self, task: &Task) {
        if self.tx.send(PersistRecord::Task(Box::new(task.clone()))).is_err() {
            tracing::warn!(task_id = %task.id, "persistence queue closed, dropping task record");
        }
    }

    pub fn event(&self, event: SystemEvent) {
        if let Err(err) = self.tx.send(PersistRecord::Event(event)) {
            if let PersistRecord::Event(event) = err.0 {
                tracing::warn!(kind = %event.kind, "persistence queue closed, dropping event");
            }
        }
    }

    /// Wait until everything queued before this call has been handed to
    /// the sink.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(PersistRecord::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

async fn drain(sink: Arc<dyn PersistenceSink>, mut rx: mpsc::UnboundedReceiver<PersistRecord>) {
    let mut written: u64 = 0;
    let mut failed: u64 = 0;

    while let Some(record) = rx.recv().await {
        match record {
            PersistRecord::Task(task) => match sink.persist_task(&task).await {
                Ok(()) => written += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(task_id = %task.id, status = %task.status, error = %e, "failed to persist task");
                    let event = SystemEvent::new(
                        SystemEventKind::TaskPersistFailed,
                        format!("Task {}: {}", task.id, e),
                    );
                    if let Err(e) = sink.persist_event(&event).await {
                        tracing::debug!(error = %e, "failed to record persistence failure");
                    }
                }
            },
            PersistRecord::Event(event) => match sink.persist_event(&event).await {
                Ok(()) => written += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(kind = %event.kind, error = %e, "failed to persist system event");
                }
            },
            PersistRecord::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    tracing::debug!(written, failed, "persistence queue drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TaskCategory, TaskDraft, TaskId};
    use crate::domain::ports::SinkError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        tasks: Mutex<Vec<TaskId>>,
        events: Mutex<Vec<SystemEventKind>>,
        fail_tasks: bool,
    }

    #[async_trait]
    impl PersistenceSink for RecordingSink {
        async fn persist_task(&self, task: &Task) -> Result<(), SinkError> {
            if self.fail_tasks {
                return Err(SinkError::Unavailable("down".to_string()));
            }
            self.tasks.lock().unwrap().push(task.id.clone());
            Ok(())
        }

        async fn persist_event(&self, event: &SystemEvent) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event.kind);
            Ok(())
        }
    }

    fn task(id: &str) -> Task {
        Task::from_draft(
            TaskId::from(id),
            TaskDraft::new(TaskCategory::Api, "work", 1.0),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_records_written_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let (queue, handle) = PersistenceQueue::spawn(sink.clone());

        queue.task(&task("a"));
        queue.event(SystemEvent::new(SystemEventKind::SystemStarted, "up"));
        queue.task(&task("b"));
        queue.flush().await;

        assert_eq!(
            *sink.tasks.lock().unwrap(),
            vec![TaskId::from("a"), TaskId::from("b")]
        );
        assert_eq!(*sink.events.lock().unwrap(), vec![SystemEventKind::SystemStarted]);

        drop(queue);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sink_failures_do_not_stop_drain() {
        let sink = Arc::new(RecordingSink {
            fail_tasks: true,
            ..RecordingSink::default()
        });
        let (queue, _handle) = PersistenceQueue::spawn(sink.clone());

        queue.task(&task("a"));
        queue.event(SystemEvent::new(SystemEventKind::SystemStopped, "down"));
        queue.flush().await;

        assert!(sink.tasks.lock().unwrap().is_empty());
        assert_eq!(
            *sink.events.lock().unwrap(),
            vec![SystemEventKind::TaskPersistFailed, SystemEventKind::SystemStopped]
        );
    }
}
