//! Domain layer for the Lynx orchestrator
//!
//! Task model, errors, and the ports adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
