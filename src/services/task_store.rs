//! Canonical in-memory task set.
//!
//! Tasks are kept in insertion order, which is also the order the
//! scheduler considers pending work in. Nothing is ever removed: terminal
//! tasks stay behind as an audit trail.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Task, TaskDraft, TaskId, TaskStatus};

/// Attempts at drawing a fresh id before giving up.
const MAX_ID_ATTEMPTS: u32 = 8;

/// Insertion-ordered task collection with an id index.
///
/// Tasks are never removed, so positions in the index stay valid.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    total_tasks: u64,
}

impl TaskStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a draft as a new pending task and return its id.
    ///
    /// The draft is not validated here; callers go through
    /// `Scheduler::add_task` for that.
    pub fn enqueue(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> DomainResult<TaskId> {
        self.enqueue_with(draft, now, TaskId::generate)
    }

    /// Same as [`enqueue`](Self::enqueue) with a caller-supplied id source.
    ///
    /// Colliding ids are redrawn up to a fixed number of attempts; an
    /// existing task is never overwritten.
    pub fn enqueue_with<F>(
        &mut self,
        draft: TaskDraft,
        now: DateTime<Utc>,
        mut next_id: F,
    ) -> DomainResult<TaskId>
    where
        F: FnMut(DateTime<Utc>) -> TaskId,
    {
        let mut attempts = 0;
        let id = loop {
            attempts += 1;
            let candidate = next_id(now);
            if !self.index.contains_key(&candidate) {
                break candidate;
            }
            tracing::warn!(task_id = %candidate, attempts, "task id collision, regenerating");
            if attempts >= MAX_ID_ATTEMPTS {
                return Err(DomainError::IdCollision { attempts });
            }
        };

        let task = Task::from_draft(id.clone(), draft, now);
        self.index.insert(id.clone(), self.tasks.len());
        self.tasks.push(task);
        self.total_tasks += 1;
        Ok(id)
    }

    /// Look up a task by id.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).map(|&idx| &self.tasks[idx])
    }

    /// All tasks in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Apply a mutation to a single task.
    pub fn update<F, R>(&mut self, id: &TaskId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Task) -> DomainResult<R>,
    {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.clone()))?;
        f(&mut self.tasks[idx])
    }

    /// Tasks currently in `status`, in insertion order.
    pub fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// Number of tasks currently in `status`.
    pub fn count(&self, status: TaskStatus) -> usize {
        self.with_status(status).count()
    }

    /// Number of tasks ever enqueued.
    pub fn total_tasks(&self) -> u64 {
        self.total_tasks
    }

    /// Number of tasks held.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True before the first enqueue.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskCategory;

    fn draft(description: &str) -> TaskDraft {
        TaskDraft::new(TaskCategory::Database, description, 48.0)
    }

    #[test]
    fn test_enqueue_assigns_pending_state() {
        let mut store = TaskStore::new();
        let now = Utc::now();
        let id = store.enqueue(draft("schema"), now).unwrap();

        let task = store.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
        assert_eq!(store.total_tasks(), 1);
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let mut store = TaskStore::new();
        let now = Utc::now();
        let ids: Vec<TaskId> = (0..5)
            .map(|i| store.enqueue(draft(&format!("task {i}")), now).unwrap())
            .collect();

        let listed: Vec<TaskId> = store.all().iter().map(|t| t.id.clone()).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_collision_is_regenerated() {
        let mut store = TaskStore::new();
        let now = Utc::now();
        store
            .enqueue_with(draft("first"), now, |_| TaskId::from("fixed"))
            .unwrap();

        let mut calls = 0;
        let id = store
            .enqueue_with(draft("second"), now, |_| {
                calls += 1;
                if calls == 1 {
                    TaskId::from("fixed")
                } else {
                    TaskId::from("fresh")
                }
            })
            .unwrap();

        assert_eq!(id, TaskId::from("fresh"));
        assert_eq!(store.get(&TaskId::from("fixed")).unwrap().description, "first");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_collision_gives_up() {
        let mut store = TaskStore::new();
        let now = Utc::now();
        store
            .enqueue_with(draft("first"), now, |_| TaskId::from("fixed"))
            .unwrap();

        let result = store.enqueue_with(draft("second"), now, |_| TaskId::from("fixed"));
        assert!(matches!(result, Err(DomainError::IdCollision { attempts: 8 })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_tasks(), 1);
    }

    #[test]
    fn test_update_unknown_task() {
        let mut store = TaskStore::new();
        let result = store.update(&TaskId::from("missing"), |_| Ok(()));
        assert!(matches!(result, Err(DomainError::TaskNotFound(_))));
    }

    #[test]
    fn test_count_by_status() {
        let mut store = TaskStore::new();
        let now = Utc::now();
        let a = store.enqueue(draft("a"), now).unwrap();
        store.enqueue(draft("b"), now).unwrap();
        store.update(&a, |t| t.start(now)).unwrap();

        assert_eq!(store.count(TaskStatus::Pending), 1);
        assert_eq!(store.count(TaskStatus::InProgress), 1);
    }
}
