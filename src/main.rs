//! Lynx CLI entry point.

use clap::Parser;

use lynx_orchestrator::cli::{self, Cli, Commands};
use lynx_orchestrator::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Run(args) => cli::commands::run::execute(args, config, cli.json).await,
        Commands::Simulate(args) => cli::commands::simulate::execute(args, config, cli.json),
        Commands::Config(command) => cli::commands::config::execute(command, config, cli.json),
    };

    if let Err(err) = result {
        cli::handle_error(err, cli.json);
    }
}
