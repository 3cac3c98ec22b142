//! Null persistence sink.
//!
//! Used when persistence is not needed but the type system
//! requires a `PersistenceSink` implementation.

use async_trait::async_trait;

use super::{PersistenceSink, SinkError};
use crate::domain::models::{SystemEvent, Task};

/// A sink that discards every record.
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PersistenceSink for NullSink {
    async fn persist_task(&self, _task: &Task) -> Result<(), SinkError> {
        Ok(())
    }

    async fn persist_event(&self, _event: &SystemEvent) -> Result<(), SinkError> {
        Ok(())
    }
}
