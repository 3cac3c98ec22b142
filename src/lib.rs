//! Lynx - autonomous development task orchestrator
//!
//! Drives a queue of long-running development tasks for a transportation
//! management system: dependency-aware and concurrency-bounded scheduling,
//! simulated progress, quality and deployment gates, and write-through
//! persistence of every task and system event.
//!
//! # Architecture
//!
//! - **Domain** (`domain`): task model, configuration, errors and ports
//! - **Services** (`services`): the scheduler tick and the policies it runs
//! - **Application** (`application`): the wall-clock orchestrator loop
//! - **Adapters** (`adapters`): SQLite and in-memory persistence sinks
//! - **Infrastructure** (`infrastructure`): configuration loading and logging
//! - **CLI** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lynx_orchestrator::adapters::memory::InMemorySink;
//! use lynx_orchestrator::application::Orchestrator;
//! use lynx_orchestrator::domain::models::OrchestratorConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(OrchestratorConfig::default(), Arc::new(InMemorySink::new()));
//!     orchestrator.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     orchestrator.stop().await;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use application::Orchestrator;
pub use domain::models::{
    AggregateMetrics, Config, OrchestratorConfig, SystemEvent, SystemEventKind, Task,
    TaskCategory, TaskDraft, TaskId, TaskOrigin, TaskPriority, TaskStatus,
};
pub use domain::{DomainError, DomainResult};
pub use services::{Scheduler, TickReport};
