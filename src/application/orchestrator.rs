//! Wall-clock driver for the scheduler.
//!
//! Owns the [`Scheduler`] behind a read/write lock and fires
//! [`Scheduler::tick`] on a fixed interval from a background task.
//! Readers get cloned snapshots; only the tick loop and task submission
//! take the write lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AggregateMetrics, OrchestratorConfig, SystemEvent, SystemEventKind, Task, TaskDraft, TaskId,
};
use crate::domain::ports::{PersistenceSink, TaskProcessor};
use crate::services::bootstrap;
use crate::services::persistence_queue::PersistenceQueue;
use crate::services::scheduler::{Scheduler, TickReport};

pub struct Orchestrator {
    scheduler: Arc<RwLock<Scheduler>>,
    persistence: PersistenceQueue,
    running: Arc<AtomicBool>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
    seed_bootstrap_plan: bool,
}

impl Orchestrator {
    /// Create a stopped orchestrator using the simulated processor.
    ///
    /// Must be called from within a tokio runtime: the persistence drain
    /// task is spawned immediately.
    pub fn new(config: OrchestratorConfig, sink: Arc<dyn PersistenceSink>) -> Self {
        let (persistence, _drain) = PersistenceQueue::spawn(sink);
        let scheduler = Scheduler::simulated(config).with_persistence(persistence.clone());
        Self::from_scheduler(scheduler, persistence)
    }

    /// Create a stopped orchestrator with a custom processor.
    pub fn with_processor(
        config: OrchestratorConfig,
        sink: Arc<dyn PersistenceSink>,
        processor: Arc<dyn TaskProcessor>,
    ) -> Self {
        let (persistence, _drain) = PersistenceQueue::spawn(sink);
        let scheduler = Scheduler::new(config, processor).with_persistence(persistence.clone());
        Self::from_scheduler(scheduler, persistence)
    }

    fn from_scheduler(scheduler: Scheduler, persistence: PersistenceQueue) -> Self {
        let tick_interval = Duration::from_millis(scheduler.config().tick_interval_ms);
        let seed_bootstrap_plan = scheduler.config().seed_bootstrap_plan;
        Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            persistence,
            running: Arc::new(AtomicBool::new(false)),
            loop_handle: Mutex::new(None),
            tick_interval,
            seed_bootstrap_plan,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the tick loop.
    ///
    /// Validates the orchestrator configuration, then seeds the bootstrap
    /// plan when configured and the store is empty. Either failure leaves
    /// the orchestrator stopped and records `system_start_failed`. Calling
    /// `start` on a running orchestrator is a no-op.
    pub async fn start(&self) -> DomainResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("orchestrator already running");
            return Ok(());
        }

        {
            let mut scheduler = self.scheduler.write().await;
            if let Err(e) = self.prepare(&mut scheduler) {
                self.running.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "failed to start orchestrator");
                self.persistence.event(SystemEvent::new(
                    SystemEventKind::SystemStartFailed,
                    format!("Error: {e}"),
                ));
                return Err(e);
            }
            let agents = scheduler.roster().active_keys();
            scheduler.set_active_agents(agents);
        }

        self.persistence.event(SystemEvent::new(
            SystemEventKind::SystemStarted,
            "Autonomous development system started",
        ));
        tracing::info!(
            tick_interval_ms = self.tick_interval.as_millis() as u64,
            "orchestrator started"
        );

        let handle = tokio::spawn(run_loop(
            self.scheduler.clone(),
            self.running.clone(),
            self.persistence.clone(),
            self.tick_interval,
        ));
        *self.loop_handle.lock().await = Some(handle);
        Ok(())
    }

    fn prepare(&self, scheduler: &mut Scheduler) -> DomainResult<()> {
        scheduler.config().validate()?;
        if self.seed_bootstrap_plan && scheduler.store().is_empty() {
            bootstrap::seed(scheduler, Utc::now())?;
        }
        Ok(())
    }

    /// Halt future ticks. In-progress tasks keep their state.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.loop_handle.lock().await.take() {
            handle.abort();
        }
        self.scheduler.write().await.set_active_agents(Vec::new());

        self.persistence.event(SystemEvent::new(
            SystemEventKind::SystemStopped,
            "Autonomous development system stopped",
        ));
        tracing::info!("orchestrator stopped");
    }

    pub async fn add_task(&self, draft: TaskDraft) -> DomainResult<TaskId> {
        self.scheduler.write().await.add_task(draft, Utc::now())
    }

    /// Run a tick immediately, outside the timer.
    pub async fn tick_now(&self) -> DomainResult<TickReport> {
        self.scheduler.write().await.tick(Utc::now())
    }

    pub async fn metrics(&self) -> AggregateMetrics {
        self.scheduler.read().await.metrics()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.scheduler.read().await.tasks().to_vec()
    }

    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.scheduler.read().await.task(id).cloned()
    }

    /// Wait for queued persistence writes to reach the sink.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }
}

async fn run_loop(
    scheduler: Arc<RwLock<Scheduler>>,
    running: Arc<AtomicBool>,
    persistence: PersistenceQueue,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Skip first tick (fires immediately)
    interval.tick().await;

    loop {
        interval.tick().await;
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let result = scheduler.write().await.tick(Utc::now());
        match result {
            Ok(report) if !report.is_idle() => {
                tracing::info!(
                    started = report.started.len(),
                    completed = report.completed.len(),
                    failed = report.failed.len(),
                    injected = report.injected.len(),
                    "tick processed"
                );
            }
            Ok(_) => tracing::debug!("tick idle"),
            Err(e) => {
                tracing::error!(error = %e, "development loop error");
                persistence.event(SystemEvent::new(
                    SystemEventKind::DevelopmentLoopError,
                    format!("Error: {e}"),
                ));
            }
        }
    }
}
