//! Metric-driven task injection.
//!
//! After each tick's metrics are computed, two gates may enqueue work:
//! a quality gate that asks for a remediation testing task, and a
//! deployment gate that asks for a production release.

use serde_json::json;

use crate::domain::models::{
    AggregateMetrics, OrchestratorConfig, TaskCategory, TaskDraft, TaskOrigin, TaskPriority,
    TaskStatus,
};
use crate::services::agent_roster::AgentRoster;
use crate::services::task_store::TaskStore;

const QUALITY_TASK_HOURS: f64 = 24.0;
const DEPLOYMENT_TASK_HOURS: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct GateTrigger {
    quality_threshold: f64,
    auto_deploy_enabled: bool,
    suppress_duplicates: bool,
}

impl GateTrigger {
    pub fn new(quality_threshold: f64, auto_deploy_enabled: bool, suppress_duplicates: bool) -> Self {
        Self {
            quality_threshold,
            auto_deploy_enabled,
            suppress_duplicates,
        }
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(
            config.quality_threshold,
            config.auto_deploy_enabled,
            config.gates.suppress_duplicates,
        )
    }

    pub fn quality_threshold(&self) -> f64 {
        self.quality_threshold
    }

    /// Every critical task completed and quality at or above threshold.
    /// Vacuously satisfied when there are no critical tasks.
    pub fn should_deploy(&self, store: &TaskStore, metrics: &AggregateMetrics) -> bool {
        let critical_done = store
            .all()
            .iter()
            .filter(|t| t.priority == TaskPriority::Critical)
            .all(|t| t.status == TaskStatus::Completed);
        critical_done && metrics.code_quality >= self.quality_threshold
    }

    /// Drafts to enqueue this tick, quality gate first.
    pub fn evaluate(
        &self,
        store: &TaskStore,
        metrics: &AggregateMetrics,
        roster: &AgentRoster,
    ) -> Vec<TaskDraft> {
        let mut drafts = Vec::new();

        if metrics.code_quality < self.quality_threshold
            && self.may_fire(store, roster, TaskOrigin::QualityGate, TaskCategory::Testing)
        {
            tracing::warn!(
                code_quality = metrics.code_quality,
                threshold = self.quality_threshold,
                "code quality below threshold, triggering improvements"
            );
            drafts.push(self.quality_task());
        }

        if self.auto_deploy_enabled
            && self.should_deploy(store, metrics)
            && self.may_fire(store, roster, TaskOrigin::DeploymentGate, TaskCategory::Deployment)
        {
            tracing::info!(code_quality = metrics.code_quality, "triggering automated deployment");
            drafts.push(Self::deployment_task());
        }

        drafts
    }

    fn may_fire(
        &self,
        store: &TaskStore,
        roster: &AgentRoster,
        origin: TaskOrigin,
        category: TaskCategory,
    ) -> bool {
        if !roster.is_enabled(category) {
            tracing::debug!(gate = origin.as_str(), %category, "gate skipped, agent disabled");
            return false;
        }
        if self.suppress_duplicates
            && store
                .all()
                .iter()
                .any(|t| t.origin == origin && !t.is_terminal())
        {
            tracing::debug!(gate = origin.as_str(), "gate skipped, earlier task still open");
            return false;
        }
        true
    }

    pub fn quality_task(&self) -> TaskDraft {
        TaskDraft::new(
            TaskCategory::Testing,
            "Improve code quality and coverage",
            QUALITY_TASK_HOURS,
        )
        .with_priority(TaskPriority::High)
        .with_requirements(json!({ "target_quality": self.quality_threshold }))
        .with_origin(TaskOrigin::QualityGate)
    }

    pub fn deployment_task() -> TaskDraft {
        TaskDraft::new(
            TaskCategory::Deployment,
            "Automated production deployment",
            DEPLOYMENT_TASK_HOURS,
        )
        .with_priority(TaskPriority::High)
        .with_requirements(json!({ "environment": "production", "auto_rollback": true }))
        .with_origin(TaskOrigin::DeploymentGate)
    }
}
