//! Terminal transitions for in-progress tasks.

use chrono::{DateTime, Utc};

use crate::domain::errors::DomainResult;
use crate::domain::models::TaskId;
use crate::services::concurrency_gate::ConcurrencyGate;
use crate::services::dependency_resolver::DependencyResolver;
use crate::services::task_store::TaskStore;

/// Result of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub task_id: TaskId,
    /// Dependents that became startable. They stay pending until the next
    /// tick so the concurrency gate remains the only way in.
    pub newly_startable: Vec<TaskId>,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionHandler {
    resolver: DependencyResolver,
}

impl CompletionHandler {
    pub fn new(resolver: DependencyResolver) -> Self {
        Self { resolver }
    }

    /// Mark a task completed, release its slot, and re-evaluate dependents.
    pub fn complete(
        &self,
        store: &mut TaskStore,
        gate: &mut ConcurrencyGate,
        id: &TaskId,
        now: DateTime<Utc>,
    ) -> DomainResult<CompletionOutcome> {
        store.update(id, |task| task.complete(now))?;
        gate.release(id);

        if let Some(task) = store.get(id) {
            tracing::info!(
                task_id = %id,
                category = %task.category,
                actual_hours = task.actual_duration_hours.unwrap_or_default(),
                "task completed"
            );
        }

        let newly_startable: Vec<TaskId> = self
            .resolver
            .dependents_of(id, store)
            .into_iter()
            .filter(|dependent| !dependent.is_terminal())
            .filter(|dependent| self.resolver.can_start(dependent, store))
            .map(|dependent| {
                tracing::info!(
                    task_id = %dependent.id,
                    category = %dependent.category,
                    unblocked_by = %id,
                    "dependent task ready"
                );
                dependent.id.clone()
            })
            .collect();

        Ok(CompletionOutcome {
            task_id: id.clone(),
            newly_startable,
        })
    }

    /// Mark a task failed with `message`. Failures are terminal; nothing is
    /// retried and dependents stay blocked.
    pub fn fail(
        &self,
        store: &mut TaskStore,
        gate: &mut ConcurrencyGate,
        id: &TaskId,
        message: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        store.update(id, |task| task.fail(message, now))?;
        gate.release(id);

        let blocked = self.resolver.dependents_of(id, store).len();
        tracing::error!(task_id = %id, error = message, blocked_dependents = blocked, "task failed");
        Ok(())
    }
}
