//! `lynx run`: drive the orchestrator on the wall clock until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::memory::InMemorySink;
use crate::adapters::sqlite::{initialize_database, SqliteSink};
use crate::application::Orchestrator;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::RunArgs;
use crate::domain::models::{AggregateMetrics, Config};
use crate::domain::ports::PersistenceSink;

#[derive(Debug, Serialize)]
pub struct RunOutput {
    /// Database path, or `None` when state was kept in memory
    pub database: Option<String>,
    pub metrics: AggregateMetrics,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let location = self.database.as_deref().map_or_else(
            || "State was kept in memory and has been discarded.".to_string(),
            |path| format!("State persisted to {path}"),
        );
        format!(
            "Orchestrator stopped. {location}\n{}",
            TableFormatter::new().format_metrics(&self.metrics)
        )
    }
}

pub async fn execute(args: RunArgs, mut config: Config, json_mode: bool) -> Result<()> {
    if let Some(ms) = args.tick_interval_ms {
        anyhow::ensure!(ms > 0, "--tick-interval-ms must be positive");
        config.orchestrator.tick_interval_ms = ms;
    }
    if args.no_bootstrap {
        config.orchestrator.seed_bootstrap_plan = false;
    }

    let pool = if args.in_memory {
        None
    } else {
        Some(
            initialize_database(&config.database)
                .await
                .context("Failed to initialize database")?,
        )
    };
    let sink: Arc<dyn PersistenceSink> = match &pool {
        Some(pool) => Arc::new(SqliteSink::new(pool.clone())),
        None => Arc::new(InMemorySink::new()),
    };

    let orchestrator = Orchestrator::new(config.orchestrator.clone(), sink);
    orchestrator
        .start()
        .await
        .context("Failed to start orchestrator")?;

    if !json_mode {
        eprintln!(
            "Orchestrator running (tick every {} ms). Press Ctrl-C to stop.",
            config.orchestrator.tick_interval_ms
        );
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    orchestrator.stop().await;
    orchestrator.flush().await;
    let metrics = orchestrator.metrics().await;

    let database = match pool {
        Some(pool) => {
            pool.close().await;
            Some(config.database.path)
        }
        None => None,
    };

    output(&RunOutput { database, metrics }, json_mode);
    Ok(())
}
