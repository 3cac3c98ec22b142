//! Simulated progress for in-progress tasks.
//!
//! Work is not executed; completion is estimated from elapsed wall-clock
//! time against the task's estimate, scaled by a per-category speed
//! multiplier.

use chrono::{DateTime, Utc};

use crate::domain::models::{hours_between, ProgressAnchor, ProgressCap, ProgressConfig, Task};
use crate::domain::ports::{ProcessingError, TaskProcessor};

/// Percentage complete at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Elapsed over estimate, capped at 100
    pub raw_percent: f64,
    /// Raw progress scaled by the category multiplier
    pub adjusted_percent: f64,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.adjusted_percent >= 100.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressEstimator {
    config: ProgressConfig,
}

impl ProgressEstimator {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    /// Start of the progress window.
    pub fn anchor(&self, task: &Task) -> DateTime<Utc> {
        match self.config.anchor {
            ProgressAnchor::StartedAt => task.started_at.unwrap_or(task.updated_at),
            ProgressAnchor::UpdatedAt => task.updated_at,
        }
    }

    pub fn estimate(&self, task: &Task, now: DateTime<Utc>) -> Progress {
        let elapsed = hours_between(self.anchor(task), now);
        let unbounded = elapsed / task.estimated_duration_hours * 100.0;
        let multiplier = task.category.speed_multiplier();

        let raw_percent = unbounded.min(100.0);
        let adjusted_percent = match self.config.cap {
            ProgressCap::BeforeMultiplier => raw_percent * multiplier,
            ProgressCap::AfterMultiplier => (unbounded * multiplier).min(100.0),
        };

        Progress {
            raw_percent,
            adjusted_percent,
        }
    }
}

/// Processor that only estimates progress and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProcessor {
    estimator: ProgressEstimator,
}

impl SimulatedProcessor {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            estimator: ProgressEstimator::new(config),
        }
    }
}

impl TaskProcessor for SimulatedProcessor {
    fn process(&self, task: &Task, now: DateTime<Utc>) -> Result<f64, ProcessingError> {
        Ok(self.estimator.estimate(task, now).adjusted_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TaskCategory, TaskDraft, TaskId};
    use chrono::Duration;

    fn started(category: TaskCategory, hours: f64, at: DateTime<Utc>) -> Task {
        let mut task = Task::from_draft(TaskId::from("t"), TaskDraft::new(category, "work", hours), at);
        task.start(at).unwrap();
        task
    }

    #[test]
    fn test_half_way_database_task() {
        let t0 = Utc::now();
        let task = started(TaskCategory::Database, 10.0, t0);
        let p = ProgressEstimator::default().estimate(&task, t0 + Duration::hours(5));
        assert!((p.raw_percent - 50.0).abs() < 1e-9);
        assert!((p.adjusted_percent - 50.0).abs() < 1e-9);
        assert!(!p.is_complete());
    }

    #[test]
    fn test_testing_finishes_early() {
        let t0 = Utc::now();
        let task = started(TaskCategory::Testing, 10.0, t0);
        let estimator = ProgressEstimator::default();
        // 1.2x: complete once 10/1.2 hours have elapsed
        assert!(!estimator.estimate(&task, t0 + Duration::hours(8)).is_complete());
        assert!(estimator.estimate(&task, t0 + Duration::hours(9)).is_complete());
    }

    #[test]
    fn test_cap_after_multiplier_lets_slow_work_finish() {
        let t0 = Utc::now();
        let task = started(TaskCategory::Research, 10.0, t0);
        let estimator = ProgressEstimator::default();
        assert!(!estimator.estimate(&task, t0 + Duration::hours(19)).is_complete());
        let p = estimator.estimate(&task, t0 + Duration::hours(20));
        assert!(p.is_complete());
        assert!((p.adjusted_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_before_multiplier_matches_reference_formula() {
        let t0 = Utc::now();
        let task = started(TaskCategory::Research, 10.0, t0);
        let estimator = ProgressEstimator::new(ProgressConfig {
            cap: ProgressCap::BeforeMultiplier,
            ..ProgressConfig::default()
        });
        let p = estimator.estimate(&task, t0 + Duration::hours(1000));
        assert!((p.raw_percent - 100.0).abs() < 1e-9);
        assert!((p.adjusted_percent - 50.0).abs() < 1e-9);
        assert!(!p.is_complete());

        let testing = started(TaskCategory::Testing, 10.0, t0);
        let p = estimator.estimate(&testing, t0 + Duration::hours(1000));
        assert!((p.adjusted_percent - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_updated_at_anchor_resets_window() {
        let t0 = Utc::now();
        let mut task = started(TaskCategory::Database, 10.0, t0);
        task.updated_at = t0 + Duration::hours(4);

        let by_start = ProgressEstimator::default().estimate(&task, t0 + Duration::hours(5));
        let by_touch = ProgressEstimator::new(ProgressConfig {
            anchor: ProgressAnchor::UpdatedAt,
            ..ProgressConfig::default()
        })
        .estimate(&task, t0 + Duration::hours(5));

        assert!((by_start.adjusted_percent - 50.0).abs() < 1e-9);
        assert!((by_touch.adjusted_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulated_processor_never_fails() {
        let t0 = Utc::now();
        let task = started(TaskCategory::Api, 1.0, t0);
        let processor = SimulatedProcessor::default();
        let pct = processor.process(&task, t0 + Duration::hours(2)).unwrap();
        assert!((pct - 100.0).abs() < 1e-9);
    }
}
