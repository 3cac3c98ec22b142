//! Task domain model.
//!
//! Tasks are long-running units of development work. They form a DAG
//! through their dependencies and move forward through a small state
//! machine: `pending -> in_progress -> {completed, failed}`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Opaque task identifier of the form `task-<unix-millis>-<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh id stamped with `now` and a random 9 character suffix.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("task-{}-{}", now.timestamp_millis(), &suffix[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of development work. Drives the simulated speed multiplier and
/// the agent a task is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Research,
    Frontend,
    Backend,
    Database,
    Testing,
    Deployment,
    Uiux,
    Portal,
    Api,
    Security,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Research,
        Self::Frontend,
        Self::Backend,
        Self::Database,
        Self::Testing,
        Self::Deployment,
        Self::Uiux,
        Self::Portal,
        Self::Api,
        Self::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Testing => "testing",
            Self::Deployment => "deployment",
            Self::Uiux => "uiux",
            Self::Portal => "portal",
            Self::Api => "api",
            Self::Security => "security",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s.to_lowercase())
    }

    /// How fast simulated work of this kind progresses relative to its estimate.
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Self::Research => 0.5,
            Self::Database | Self::Deployment => 1.0,
            Self::Backend | Self::Portal => 0.8,
            Self::Frontend | Self::Security => 0.7,
            Self::Uiux => 0.6,
            Self::Api => 0.9,
            Self::Testing => 1.2,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level for tasks.
///
/// Scheduling is FIFO; priority only feeds the deployment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Status of a task in the orchestration pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for dependencies or a concurrency slot
    Pending,
    /// Admitted by the concurrency gate; progress is being simulated
    InProgress,
    /// Finished successfully
    Completed,
    /// Finished with an error; never retried
    Failed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" | "running" => Some(Self::InProgress),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> &'static [TaskStatus] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Submitted through `add_task` by an operator or another subsystem
    Submitted,
    /// Seeded from the bootstrap plan on start
    Bootstrap,
    /// Injected because code quality fell below the threshold
    QualityGate,
    /// Injected because the release conditions were met
    DeploymentGate,
}

impl Default for TaskOrigin {
    fn default() -> Self {
        Self::Submitted
    }
}

impl TaskOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Bootstrap => "bootstrap",
            Self::QualityGate => "quality_gate",
            Self::DeploymentGate => "deployment_gate",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "bootstrap" => Some(Self::Bootstrap),
            "quality_gate" => Some(Self::QualityGate),
            "deployment_gate" => Some(Self::DeploymentGate),
            _ => None,
        }
    }
}

/// Everything a caller supplies when submitting a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: TaskPriority,
    pub description: String,
    #[serde(default)]
    pub requirements: serde_json::Value,
    /// Agent role; defaults to the category name
    #[serde(default)]
    pub assigned_agent: Option<String>,
    pub estimated_duration_hours: f64,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub origin: TaskOrigin,
}

impl TaskDraft {
    pub fn new(
        category: TaskCategory,
        description: impl Into<String>,
        estimated_duration_hours: f64,
    ) -> Self {
        Self {
            category,
            priority: TaskPriority::default(),
            description: description.into(),
            requirements: serde_json::Value::Null,
            assigned_agent: None,
            estimated_duration_hours,
            dependencies: Vec::new(),
            origin: TaskOrigin::default(),
        }
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Add a dependency.
    pub fn with_dependency(mut self, task_id: TaskId) -> Self {
        self.dependencies.push(task_id);
        self
    }

    /// Replace the dependency list.
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = deps.into_iter().collect();
        self
    }

    pub fn with_requirements(mut self, requirements: serde_json::Value) -> Self {
        self.requirements = requirements;
        self
    }

    /// Set agent role.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.assigned_agent = Some(agent.into());
        self
    }

    pub fn with_origin(mut self, origin: TaskOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Validate the parts of a draft that do not need the store.
    pub fn validate(&self) -> DomainResult<()> {
        if self.description.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "task description cannot be empty".to_string(),
            ));
        }
        if !self.estimated_duration_hours.is_finite() || self.estimated_duration_hours <= 0.0 {
            return Err(DomainError::ValidationFailed(format!(
                "estimated duration must be a positive number of hours, got {}",
                self.estimated_duration_hours
            )));
        }
        Ok(())
    }
}

/// A unit of orchestrated work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub description: String,
    pub requirements: serde_json::Value,
    pub assigned_agent: String,
    pub status: TaskStatus,
    /// Tasks that must be completed before this one may start
    pub dependencies: Vec<TaskId>,
    pub estimated_duration_hours: f64,
    /// Wall-clock hours from creation to completion; only set once completed
    pub actual_duration_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once, when the task enters `in_progress`
    pub started_at: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
    pub origin: TaskOrigin,
}

impl Task {
    /// Materialize a draft as a fresh pending task.
    pub fn from_draft(id: TaskId, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        let assigned_agent = draft
            .assigned_agent
            .unwrap_or_else(|| draft.category.as_str().to_string());
        Self {
            id,
            category: draft.category,
            priority: draft.priority,
            description: draft.description,
            requirements: draft.requirements,
            assigned_agent,
            status: TaskStatus::Pending,
            dependencies: draft.dependencies,
            estimated_duration_hours: draft.estimated_duration_hours,
            actual_duration_hours: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            errors: Vec::new(),
            origin: draft.origin,
        }
    }

    pub fn can_transition_to(&self, new_status: TaskStatus) -> bool {
        self.status.can_transition_to(new_status)
    }

    fn transition_to(&mut self, new_status: TaskStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.can_transition_to(new_status) {
            return Err(DomainError::InvalidStateTransition {
                id: self.id.clone(),
                from: self.status,
                to: new_status,
            });
        }
        self.status = new_status;
        self.updated_at = now;
        Ok(())
    }

    /// `pending -> in_progress`.
    pub fn start(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition_to(TaskStatus::InProgress, now)?;
        self.started_at = Some(now);
        Ok(())
    }

    /// `in_progress -> completed`, recording the actual duration.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition_to(TaskStatus::Completed, now)?;
        self.actual_duration_hours = Some(hours_between(self.created_at, now));
        Ok(())
    }

    /// `in_progress -> failed`, appending the error message.
    pub fn fail(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition_to(TaskStatus::Failed, now)?;
        self.errors.push(message.into());
        Ok(())
    }

    /// Check if task is terminal.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }
}

/// Fractional hours between two instants; negative spans clamp to zero.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}
