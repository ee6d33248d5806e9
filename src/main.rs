// Quote Splitter - Composite quote documents to per-object fragments
// Copyright (c) 2025 Quote Splitter Contributors
// Licensed under the MIT License

use quote_splitter::cli::commands::EXIT_FATAL;
use quote_splitter::cli::{Cli, Commands};
use quote_splitter::config::{load_config, LoggingConfig};
use quote_splitter::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The run command logs to file when configured; a broken configuration is
    // reported by the command itself, so fall back to console-only here
    let (config_level, logging_config) = match &cli.command {
        Commands::Run(_) => load_config(&cli.config)
            .map(|c| (Some(c.application.log_level), c.logging))
            .unwrap_or_else(|_| (None, LoggingConfig::default())),
        _ => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Quote Splitter - quote document splitting"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush the file writer before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
