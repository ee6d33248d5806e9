//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the splitter using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Quote Splitter - splits composite quote documents into per-object fragments
#[derive(Parser, Debug)]
#[command(name = "quote-splitter")]
#[command(version, about, long_about = None)]
#[command(author = "Quote Splitter Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "quote-splitter.toml",
        env = "QUOTE_SPLITTER_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QUOTE_SPLITTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split every eligible quote under the source prefix and archive the originals
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["quote-splitter", "run"]);
        assert_eq!(cli.config, "quote-splitter.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["quote-splitter", "run", "--dry-run", "--fail-fast"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert!(args.fail_fast);
                assert!(!args.verify_archive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["quote-splitter", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["quote-splitter", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["quote-splitter", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["quote-splitter", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert!(args.force);
                assert_eq!(args.output, "quote-splitter.toml");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
