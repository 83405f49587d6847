//! Custodian CLI entry point.

use clap::Parser;

use custodian::cli::{handle_error, Cli, Commands};
use custodian::infrastructure::config::ConfigLoader;
use custodian::infrastructure::logging::Logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the life of the process so buffered file logs flush.
    let _logger = match Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Plan(args) => custodian::cli::commands::plan::execute(args, &config, cli.json).await,
        Commands::Tasks(args) => custodian::cli::commands::tasks::execute(args, &config, cli.json).await,
        Commands::Conflicts(args) => custodian::cli::commands::conflicts::execute(args, cli.json).await,
        Commands::Activity(args) => {
            custodian::cli::commands::activity::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
