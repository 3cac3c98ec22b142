use chrono::{DateTime, Utc};

use crate::domain::models::{hours_between, Task, TimeoutConfig};
use crate::domain::ports::ProcessingError;

/// Fails in-progress tasks that overrun their expected duration.
///
/// The budget is `estimate / speed_multiplier * factor` hours measured
/// from `started_at`. Disabled when no factor is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutPolicy {
    factor: Option<f64>,
}

impl TimeoutPolicy {
    pub fn new(factor: Option<f64>) -> Self {
        Self { factor }
    }

    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self::new(config.factor)
    }

    pub fn is_enabled(&self) -> bool {
        self.factor.is_some()
    }

    pub fn budget_hours(&self, task: &Task) -> Option<f64> {
        self.factor
            .map(|factor| task.estimated_duration_hours / task.category.speed_multiplier() * factor)
    }

    pub fn check(&self, task: &Task, now: DateTime<Utc>) -> Result<(), ProcessingError> {
        let (Some(budget), Some(started_at)) = (self.budget_hours(task), task.started_at) else {
            return Ok(());
        };
        let elapsed = hours_between(started_at, now);
        if elapsed > budget {
            return Err(ProcessingError::TimedOut { hours: elapsed });
        }
        Ok(())
    }
}
