//! Persistence adapters for the orchestrator's sink port.

pub mod memory;
pub mod sqlite;
