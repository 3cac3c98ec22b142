use std::collections::HashSet;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Task, TaskDraft, TaskId, TaskStatus};
use crate::services::task_store::TaskStore;

/// Service for resolving task dependencies.
///
/// Unresolvable references never unblock a task: an unknown or failed
/// dependency keeps its dependents pending forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// True iff every dependency refers to a completed task.
    pub fn can_start(&self, task: &Task, store: &TaskStore) -> bool {
        task.dependencies.iter().all(|dep_id| {
            store
                .get(dep_id)
                .is_some_and(|dep| dep.status == TaskStatus::Completed)
        })
    }

    /// Dependencies that are not yet completed, including unknown ids.
    pub fn blocking_dependencies(&self, task: &Task, store: &TaskStore) -> Vec<TaskId> {
        task.dependencies
            .iter()
            .filter(|dep_id| {
                store
                    .get(dep_id)
                    .is_none_or(|dep| dep.status != TaskStatus::Completed)
            })
            .cloned()
            .collect()
    }

    /// A task that can never start because a dependency failed or is missing.
    pub fn is_permanently_blocked(&self, task: &Task, store: &TaskStore) -> bool {
        task.dependencies.iter().any(|dep_id| {
            store
                .get(dep_id)
                .is_none_or(|dep| dep.status == TaskStatus::Failed)
        })
    }

    /// Tasks that list `id` among their dependencies, in queue order.
    pub fn dependents_of<'a>(&self, id: &TaskId, store: &'a TaskStore) -> Vec<&'a Task> {
        store.all().iter().filter(|t| t.depends_on(id)).collect()
    }

    /// Validate that all dependencies of a draft exist and are distinct.
    pub fn validate_draft(&self, draft: &TaskDraft, store: &TaskStore) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for dep_id in &draft.dependencies {
            if store.get(dep_id).is_none() {
                return Err(DomainError::UnknownDependency(dep_id.clone()));
            }
            if !seen.insert(dep_id) {
                return Err(DomainError::DuplicateDependency(dep_id.clone()));
            }
        }
        Ok(())
    }
}
