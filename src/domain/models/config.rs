use serde::{Deserialize, Serialize};

use super::task::TaskCategory;
use crate::domain::errors::{DomainError, DomainResult};

/// Largest accepted `max_concurrent_tasks`.
pub const MAX_CONCURRENT_TASKS_CEILING: usize = 100;

/// Main configuration structure for Lynx
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Scheduler configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Control-loop configuration passed to `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OrchestratorConfig {
    /// Upper bound on tasks in progress at once (1-100)
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Code quality below this injects a remediation task
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Inject a release task when all critical work is done
    #[serde(default = "default_true")]
    pub auto_deploy_enabled: bool,

    /// Milliseconds between ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seed the initial development plan when the store is empty
    #[serde(default = "default_true")]
    pub seed_bootstrap_plan: bool,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub gates: GateConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub agents: AgentsConfig,
}

const fn default_max_concurrent_tasks() -> usize {
    10
}

const fn default_quality_threshold() -> f64 {
    0.8
}

const fn default_tick_interval_ms() -> u64 {
    60_000
}

const fn default_true() -> bool {
    true
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: default_max_concurrent_tasks(),
            quality_threshold: default_quality_threshold(),
            auto_deploy_enabled: true,
            tick_interval_ms: default_tick_interval_ms(),
            seed_bootstrap_plan: true,
            progress: ProgressConfig::default(),
            gates: GateConfig::default(),
            timeouts: TimeoutConfig::default(),
            agents: AgentsConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Reject settings the control loop cannot run with: a zero tick
    /// interval, a concurrency limit outside 1-100, a quality threshold
    /// outside [0, 1], or a non-positive timeout factor.
    pub fn validate(&self) -> DomainResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(DomainError::ValidationFailed(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.max_concurrent_tasks == 0 || self.max_concurrent_tasks > MAX_CONCURRENT_TASKS_CEILING {
            return Err(DomainError::ValidationFailed(format!(
                "max_concurrent_tasks must be between 1 and {MAX_CONCURRENT_TASKS_CEILING}, got {}",
                self.max_concurrent_tasks
            )));
        }
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(DomainError::ValidationFailed(format!(
                "quality_threshold must be between 0.0 and 1.0, got {}",
                self.quality_threshold
            )));
        }
        if let Some(factor) = self.timeouts.factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(DomainError::ValidationFailed(format!(
                    "timeout factor must be a positive number, got {factor}"
                )));
            }
        }
        Ok(())
    }
}

/// Timestamp elapsed time is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressAnchor {
    /// Immutable start-of-work marker
    #[default]
    StartedAt,
    /// Last touch of the task; resets every tick
    UpdatedAt,
}

/// Where the 100% cap sits relative to the speed multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressCap {
    /// `min(100, raw) * multiplier`; categories slower than 1.0 never finish
    BeforeMultiplier,
    /// `min(100, raw * multiplier)`
    #[default]
    AfterMultiplier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProgressConfig {
    #[serde(default)]
    pub anchor: ProgressAnchor,
    #[serde(default)]
    pub cap: ProgressCap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GateConfig {
    /// Skip injection while an earlier task from the same gate is unfinished
    #[serde(default = "default_true")]
    pub suppress_duplicates: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            suppress_duplicates: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Fail in-progress tasks after `factor` times their expected
    /// wall-clock duration. Disabled when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

/// Per-category agent switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(clippy::struct_excessive_bools)]
pub struct AgentsConfig {
    #[serde(default = "default_true")]
    pub research: bool,
    #[serde(default = "default_true")]
    pub frontend: bool,
    #[serde(default = "default_true")]
    pub backend: bool,
    #[serde(default = "default_true")]
    pub database: bool,
    #[serde(default = "default_true")]
    pub testing: bool,
    #[serde(default = "default_true")]
    pub deployment: bool,
    #[serde(default = "default_true")]
    pub uiux: bool,
    #[serde(default = "default_true")]
    pub portal: bool,
    #[serde(default = "default_true")]
    pub api: bool,
    #[serde(default = "default_true")]
    pub security: bool,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            research: true,
            frontend: true,
            backend: true,
            database: true,
            testing: true,
            deployment: true,
            uiux: true,
            portal: true,
            api: true,
            security: true,
        }
    }
}

impl AgentsConfig {
    pub fn is_enabled(&self, category: TaskCategory) -> bool {
        match category {
            TaskCategory::Research => self.research,
            TaskCategory::Frontend => self.frontend,
            TaskCategory::Backend => self.backend,
            TaskCategory::Database => self.database,
            TaskCategory::Testing => self.testing,
            TaskCategory::Deployment => self.deployment,
            TaskCategory::Uiux => self.uiux,
            TaskCategory::Portal => self.portal,
            TaskCategory::Api => self.api,
            TaskCategory::Security => self.security,
        }
    }

    pub fn set_enabled(&mut self, category: TaskCategory, enabled: bool) {
        let slot = match category {
            TaskCategory::Research => &mut self.research,
            TaskCategory::Frontend => &mut self.frontend,
            TaskCategory::Backend => &mut self.backend,
            TaskCategory::Database => &mut self.database,
            TaskCategory::Testing => &mut self.testing,
            TaskCategory::Deployment => &mut self.deployment,
            TaskCategory::Uiux => &mut self.uiux,
            TaskCategory::Portal => &mut self.portal,
            TaskCategory::Api => &mut self.api,
            TaskCategory::Security => &mut self.security,
        };
        *slot = enabled;
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".lynx/lynx.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            directory: None,
            rotation: default_rotation(),
        }
    }
}
