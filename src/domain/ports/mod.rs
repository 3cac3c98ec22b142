//! Port trait definitions (Hexagonal Architecture)
//!
//! - `PersistenceSink`: write-through storage for tasks and system events
//! - `TaskProcessor`: per-tick progress source for in-progress tasks
//!
//! These traits keep the scheduling core independent of storage and of
//! how work is actually carried out.

pub mod null_sink;
pub mod persistence_sink;
pub mod task_processor;

pub use null_sink::NullSink;
pub use persistence_sink::{PersistenceSink, SinkError};
pub use task_processor::{ProcessingError, TaskProcessor};
