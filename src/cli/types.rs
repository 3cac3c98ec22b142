//! CLI type definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lynx")]
#[command(about = "Lynx - autonomous development task orchestrator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .lynx/ and LYNX_* variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the orchestration loop until interrupted
    Run(RunArgs),

    /// Drive the scheduler on a virtual clock and report the result
    Simulate(SimulateArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Override the tick interval in milliseconds
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,

    /// Do not seed the bootstrap plan into an empty store
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Keep tasks and events in memory instead of the SQLite database
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of ticks to run
    #[arg(short, long, default_value = "200")]
    pub ticks: u32,

    /// Virtual minutes between ticks
    #[arg(short, long, default_value = "60")]
    pub step_minutes: u32,

    /// Do not seed the bootstrap plan
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Only list tasks in this status (pending, in_progress, completed, failed)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Check the configuration and exit
    Validate,
}
