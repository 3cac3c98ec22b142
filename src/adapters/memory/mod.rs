//! In-memory persistence sink.

pub mod memory_sink;

pub use memory_sink::InMemorySink;
