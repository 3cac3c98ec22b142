//! Domain models for the Lynx orchestrator.

pub mod config;
pub mod event;
pub mod metrics;
pub mod task;

pub use config::{
    AgentsConfig, Config, DatabaseConfig, GateConfig, LoggingConfig, OrchestratorConfig,
    ProgressAnchor, ProgressCap, ProgressConfig, TimeoutConfig, MAX_CONCURRENT_TASKS_CEILING,
};
pub use event::{SystemEvent, SystemEventKind};
pub use metrics::AggregateMetrics;
pub use task::{
    hours_between, Task, TaskCategory, TaskDraft, TaskId, TaskOrigin, TaskPriority, TaskStatus,
};
