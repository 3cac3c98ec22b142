use std::collections::HashSet;

use crate::domain::models::TaskId;

/// Admits at most `limit` tasks into the in-progress set.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    limit: usize,
    in_progress: HashSet<TaskId>,
}

impl ConcurrencyGate {
    /// Empty gate admitting up to `limit` tasks.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            in_progress: HashSet::new(),
        }
    }

    /// Maximum tasks in progress at once.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Tasks currently holding a slot.
    pub fn in_progress_count(&self) -> usize {
        self.in_progress.len()
    }

    /// Free slots; zero once the gate is full.
    pub fn available_slots(&self) -> usize {
        self.limit.saturating_sub(self.in_progress.len())
    }

    /// Whether `id` currently holds a slot.
    pub fn is_tracking(&self, id: &TaskId) -> bool {
        self.in_progress.contains(id)
    }

    /// Longest prefix of `candidates`, in the order supplied, that fits in
    /// the free slots.
    pub fn admit<I>(&self, candidates: I) -> Vec<TaskId>
    where
        I: IntoIterator<Item = TaskId>,
    {
        candidates.into_iter().take(self.available_slots()).collect()
    }

    /// Record a task as in progress. Returns false when the gate is full
    /// or the task is already tracked.
    pub fn occupy(&mut self, id: TaskId) -> bool {
        if self.available_slots() == 0 {
            return false;
        }
        self.in_progress.insert(id)
    }

    /// Free the slot held by a task that reached a terminal state.
    pub fn release(&mut self, id: &TaskId) -> bool {
        self.in_progress.remove(id)
    }
}
