//! Scheduling services.
//!
//! Leaf-first: the task store, the policies that read it (dependency
//! resolution, concurrency, progress, timeouts, metrics, gates), and the
//! scheduler that runs them once per tick.

pub mod agent_roster;
pub mod bootstrap;
pub mod completion_handler;
pub mod concurrency_gate;
pub mod dependency_resolver;
pub mod gate_trigger;
pub mod metrics_aggregator;
pub mod persistence_queue;
pub mod progress_estimator;
pub mod scheduler;
pub mod task_store;
pub mod timeout_policy;

pub use agent_roster::{AgentProfile, AgentRoster};
pub use completion_handler::{CompletionHandler, CompletionOutcome};
pub use concurrency_gate::ConcurrencyGate;
pub use dependency_resolver::DependencyResolver;
pub use gate_trigger::GateTrigger;
pub use metrics_aggregator::MetricsAggregator;
pub use persistence_queue::PersistenceQueue;
pub use progress_estimator::{Progress, ProgressEstimator, SimulatedProcessor};
pub use scheduler::{Scheduler, TickReport};
pub use task_store::TaskStore;
pub use timeout_policy::TimeoutPolicy;
