//! Aggregate metrics derived from the task store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of orchestration health. Recomputed every tick, never stored
/// authoritatively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub failed_tasks: u64,
    pub in_progress_tasks: u64,
    /// Mean actual duration of completed tasks, 0 when none completed
    pub average_task_duration_hours: f64,
    pub code_quality: f64,
    pub test_coverage: f64,
    pub deployment_success: f64,
    pub security_score: f64,
    /// When the deployment gate last injected a release task
    pub last_deployment: Option<DateTime<Utc>>,
    /// Agent keys active while the orchestrator is started
    pub active_agents: Vec<String>,
}
