//! The scheduler tick.
//!
//! `Scheduler` owns the task store and every policy that acts on it. One
//! call to [`Scheduler::tick`] admits runnable work, advances in-progress
//! tasks, recomputes metrics and runs the gate trigger. Time is injected,
//! so the whole loop can be driven by a virtual clock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AggregateMetrics, OrchestratorConfig, Task, TaskDraft, TaskId, TaskOrigin, TaskStatus,
};
use crate::domain::ports::{ProcessingError, TaskProcessor};
use crate::services::agent_roster::AgentRoster;
use crate::services::completion_handler::CompletionHandler;
use crate::services::concurrency_gate::ConcurrencyGate;
use crate::services::dependency_resolver::DependencyResolver;
use crate::services::gate_trigger::GateTrigger;
use crate::services::metrics_aggregator::MetricsAggregator;
use crate::services::persistence_queue::PersistenceQueue;
use crate::services::progress_estimator::SimulatedProcessor;
use crate::services::task_store::TaskStore;
use crate::services::timeout_policy::TimeoutPolicy;

/// What a single tick did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    pub at: DateTime<Utc>,
    pub started: Vec<TaskId>,
    pub completed: Vec<TaskId>,
    pub failed: Vec<TaskId>,
    /// Dependents unblocked by this tick's completions
    pub ready: Vec<TaskId>,
    /// Tasks enqueued by the gate trigger
    pub injected: Vec<TaskId>,
    /// Adjusted progress of tasks still in progress after the tick
    pub progress: Vec<(TaskId, f64)>,
    pub metrics: AggregateMetrics,
}

impl TickReport {
    fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            ..Self::default()
        }
    }

    /// True when the tick changed no task state.
    pub fn is_idle(&self) -> bool {
        self.started.is_empty()
            && self.completed.is_empty()
            && self.failed.is_empty()
            && self.injected.is_empty()
    }
}

/// The control loop core: owns the task store and applies one tick at a
/// time against a caller-supplied clock.
///
/// Holds no timer of its own. `Orchestrator` drives it on wall-clock
/// ticks, while simulations step it through virtual time.
pub struct Scheduler {
    config: OrchestratorConfig,
    store: TaskStore,
    resolver: DependencyResolver,
    gate: ConcurrencyGate,
    completion: CompletionHandler,
    aggregator: MetricsAggregator,
    trigger: GateTrigger,
    timeouts: TimeoutPolicy,
    roster: AgentRoster,
    processor: Arc<dyn TaskProcessor>,
    persistence: Option<PersistenceQueue>,
    last_deployment: Option<DateTime<Utc>>,
    active_agents: Vec<String>,
}

impl Scheduler {
    /// Scheduler over an empty store, driving work through `processor`.
    pub fn new(config: OrchestratorConfig, processor: Arc<dyn TaskProcessor>) -> Self {
        let resolver = DependencyResolver::new();
        Self {
            store: TaskStore::new(),
            gate: ConcurrencyGate::new(config.max_concurrent_tasks),
            completion: CompletionHandler::new(resolver),
            aggregator: MetricsAggregator::new(),
            trigger: GateTrigger::from_config(&config),
            timeouts: TimeoutPolicy::from_config(&config.timeouts),
            roster: AgentRoster::new(config.agents.clone()),
            resolver,
            processor,
            persistence: None,
            last_deployment: None,
            active_agents: Vec::new(),
            config,
        }
    }

    /// Scheduler with the elapsed-time processor.
    pub fn simulated(config: OrchestratorConfig) -> Self {
        let processor = Arc::new(SimulatedProcessor::new(config.progress));
        Self::new(config, processor)
    }

    /// Write every task transition through `queue`.
    pub fn with_persistence(mut self, queue: PersistenceQueue) -> Self {
        self.persistence = Some(queue);
        self
    }

    /// Loop configuration this scheduler was built with.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Configured agents and which of them are enabled.
    pub fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    /// Read-only view of the task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.store.all()
    }

    /// Look up a task by id.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    /// Replace the agent keys reported in metrics.
    pub fn set_active_agents(&mut self, agents: Vec<String>) {
        self.active_agents = agents;
    }

    /// Validate and enqueue a task.
    pub fn add_task(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> DomainResult<TaskId> {
        draft.validate()?;
        if !self.roster.is_enabled(draft.category) {
            return Err(DomainError::CategoryDisabled(draft.category));
        }
        self.resolver.validate_draft(&draft, &self.store)?;

        let category = draft.category;
        let origin = draft.origin;
        let id = self.store.enqueue(draft, now)?;
        self.persist(&id);
        tracing::info!(
            task_id = %id,
            %category,
            origin = origin.as_str(),
            "task added"
        );
        Ok(id)
    }

    /// Current metrics, computed fresh from the store.
    pub fn metrics(&self) -> AggregateMetrics {
        let mut metrics = self.aggregator.aggregate(&self.store);
        metrics.last_deployment = self.last_deployment;
        metrics.active_agents.clone_from(&self.active_agents);
        metrics
    }

    /// Whether the deployment gate would fire against the current store.
    pub fn should_deploy(&self) -> bool {
        self.trigger.should_deploy(&self.store, &self.metrics())
    }

    /// Run one pass of the control loop at `now`.
    ///
    /// Transitions are applied in store order, so the same store and `now`
    /// always produce the same report.
    pub fn tick(&mut self, now: DateTime<Utc>) -> DomainResult<TickReport> {
        let mut report = TickReport::new(now);

        self.start_runnable(now, &mut report)?;
        self.advance_in_progress(now, &mut report)?;

        let metrics = self.metrics();
        tracing::debug!(
            completed = metrics.completed_tasks,
            failed = metrics.failed_tasks,
            in_progress = metrics.in_progress_tasks,
            code_quality = metrics.code_quality,
            "metrics updated"
        );

        for draft in self.trigger.evaluate(&self.store, &metrics, &self.roster) {
            let deploying = draft.origin == TaskOrigin::DeploymentGate;
            let id = self.add_task(draft, now)?;
            if deploying {
                self.last_deployment = Some(now);
            }
            report.injected.push(id);
        }

        report.metrics = self.metrics();
        Ok(report)
    }

    fn start_runnable(&mut self, now: DateTime<Utc>, report: &mut TickReport) -> DomainResult<()> {
        let runnable: Vec<TaskId> = self
            .store
            .with_status(TaskStatus::Pending)
            .filter(|task| self.resolver.can_start(task, &self.store))
            .map(|task| task.id.clone())
            .collect();

        for id in self.gate.admit(runnable) {
            self.store.update(&id, |task| task.start(now))?;
            self.gate.occupy(id.clone());
            self.persist(&id);
            if let Some(task) = self.store.get(&id) {
                tracing::info!(
                    task_id = %id,
                    category = %task.category,
                    agent = %task.assigned_agent,
                    "task started"
                );
            }
            report.started.push(id);
        }
        Ok(())
    }

    fn advance_in_progress(&mut self, now: DateTime<Utc>, report: &mut TickReport) -> DomainResult<()> {
        let in_progress: Vec<TaskId> = self
            .store
            .with_status(TaskStatus::InProgress)
            .map(|task| task.id.clone())
            .collect();

        for id in in_progress {
            let outcome = {
                let task = self
                    .store
                    .get(&id)
                    .ok_or_else(|| DomainError::TaskNotFound(id.clone()))?;
                self.timeouts
                    .check(task, now)
                    .and_then(|()| self.processor.process(task, now))
            };

            match outcome {
                Ok(percent) if percent >= 100.0 => {
                    let done = self
                        .completion
                        .complete(&mut self.store, &mut self.gate, &id, now)?;
                    self.persist(&id);
                    report.ready.extend(done.newly_startable);
                    report.completed.push(id);
                }
                Ok(percent) => {
                    self.store.update(&id, |task| {
                        task.updated_at = now;
                        Ok(())
                    })?;
                    tracing::trace!(task_id = %id, progress = percent, "task progressed");
                    report.progress.push((id, percent));
                }
                Err(ProcessingError::Unavailable(reason)) => {
                    tracing::warn!(task_id = %id, %reason, "task processor unavailable, aborting tick");
                    return Err(DomainError::ProcessorUnavailable(reason));
                }
                Err(err) => {
                    self.completion
                        .fail(&mut self.store, &mut self.gate, &id, &err.to_string(), now)?;
                    self.persist(&id);
                    report.failed.push(id);
                }
            }
        }
        Ok(())
    }

    fn persist(&self, id: &TaskId) {
        if let (Some(queue), Some(task)) = (&self.persistence, self.store.get(id)) {
            queue.task(task);
        }
    }
}
