//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use lynx_orchestrator::domain::models::OrchestratorConfig;

/// Initialize tracing for test output. Safe to call more than once.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fixed virtual-clock origin so runs are reproducible.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
}

pub fn hours(h: i64) -> Duration {
    Duration::hours(h)
}

/// Config with both gates silenced, so only submitted tasks exist.
pub fn quiet_config(max_concurrent_tasks: usize) -> OrchestratorConfig {
    OrchestratorConfig {
        max_concurrent_tasks,
        quality_threshold: 0.0,
        auto_deploy_enabled: false,
        seed_bootstrap_plan: false,
        ..OrchestratorConfig::default()
    }
}
