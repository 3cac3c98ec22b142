//! `lynx simulate`: run the scheduler against a virtual clock.
//!
//! No database and no timer. Each step advances the clock by
//! `--step-minutes` and runs one tick, which makes the long task
//! estimates of the bootstrap plan observable in seconds.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::SimulateArgs;
use crate::domain::models::{AggregateMetrics, Config, Task, TaskOrigin, TaskStatus};
use crate::services::{bootstrap, Scheduler};

#[derive(Debug, Serialize)]
pub struct SimulateOutput {
    pub ticks: u32,
    pub simulated_hours: f64,
    pub deployments_triggered: usize,
    pub tasks: Vec<Task>,
    pub metrics: AggregateMetrics,
}

impl CommandOutput for SimulateOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut out = format!(
            "Simulated {} ticks ({:.1} hours), {} deployment(s) triggered\n",
            self.ticks, self.simulated_hours, self.deployments_triggered
        );
        if self.tasks.is_empty() {
            out.push_str("No tasks.\n");
        } else {
            out.push_str(&formatter.format_tasks(&self.tasks));
            out.push('\n');
        }
        out.push_str(&formatter.format_metrics(&self.metrics));
        out
    }
}

pub fn execute(args: SimulateArgs, config: Config, json_mode: bool) -> Result<()> {
    anyhow::ensure!(args.step_minutes > 0, "--step-minutes must be positive");
    let status_filter = args
        .status
        .as_deref()
        .map(|s| TaskStatus::from_str(s).with_context(|| format!("Unknown task status: {s}")))
        .transpose()?;

    let mut scheduler = Scheduler::simulated(config.orchestrator);
    let start = Utc::now();
    let step = Duration::minutes(i64::from(args.step_minutes));

    if !args.no_bootstrap {
        let seeded = bootstrap::seed(&mut scheduler, start).context("Failed to seed bootstrap plan")?;
        tracing::info!(count = seeded.len(), "seeded bootstrap plan");
    }
    let agents = scheduler.roster().active_keys();
    scheduler.set_active_agents(agents);

    let mut now = start;
    let mut deployments_triggered = 0;
    for _ in 0..args.ticks {
        now += step;
        let report = scheduler.tick(now)?;
        deployments_triggered += report
            .injected
            .iter()
            .filter_map(|id| scheduler.task(id))
            .filter(|t| t.origin == TaskOrigin::DeploymentGate)
            .count();
        if !report.is_idle() {
            tracing::debug!(
                at = %report.at,
                started = report.started.len(),
                completed = report.completed.len(),
                failed = report.failed.len(),
                injected = report.injected.len(),
                "simulated tick"
            );
        }
    }

    let tasks = scheduler
        .tasks()
        .iter()
        .filter(|t| status_filter.map_or(true, |s| t.status == s))
        .cloned()
        .collect();

    output(
        &SimulateOutput {
            ticks: args.ticks,
            simulated_hours: f64::from(args.ticks) * f64::from(args.step_minutes) / 60.0,
            deployments_triggered,
            tasks,
            metrics: scheduler.metrics(),
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(ticks: u32) -> SimulateArgs {
        SimulateArgs {
            ticks,
            step_minutes: 60,
            no_bootstrap: false,
            status: None,
        }
    }

    #[test]
    fn test_simulate_runs_bootstrap_plan() {
        execute(args(24), Config::default(), true).unwrap();
    }

    #[test]
    fn test_simulate_rejects_unknown_status() {
        let mut bad = args(1);
        bad.status = Some("sleeping".to_string());
        assert!(execute(bad, Config::default(), true).is_err());
    }

    #[test]
    fn test_simulate_rejects_zero_step() {
        let mut bad = args(1);
        bad.step_minutes = 0;
        assert!(execute(bad, Config::default(), true).is_err());
    }
}
