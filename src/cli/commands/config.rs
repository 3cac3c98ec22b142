//! `lynx config`: show or validate the effective configuration.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ConfigCommands;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    #[serde(flatten)]
    pub config: Config,
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("failed to render configuration: {e}"))
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigValidateOutput {
    pub valid: bool,
    pub max_concurrent_tasks: usize,
    pub enabled_agents: Vec<String>,
}

impl CommandOutput for ConfigValidateOutput {
    fn to_human(&self) -> String {
        format!(
            "Configuration is valid\n  max concurrent tasks: {}\n  enabled agents: {}",
            self.max_concurrent_tasks,
            self.enabled_agents.join(", ")
        )
    }
}

pub fn execute(command: ConfigCommands, config: Config, json_mode: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => output(&ConfigShowOutput { config }, json_mode),
        ConfigCommands::Validate => {
            ConfigLoader::validate(&config).context("Configuration is invalid")?;
            let enabled_agents = crate::services::AgentRoster::new(config.orchestrator.agents)
                .active_keys();
            output(
                &ConfigValidateOutput {
                    valid: true,
                    max_concurrent_tasks: config.orchestrator.max_concurrent_tasks,
                    enabled_agents,
                },
                json_mode,
            );
        }
    }
    Ok(())
}
