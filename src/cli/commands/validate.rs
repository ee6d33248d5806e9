//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the splitter configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a configuration that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        let layout = config.layout();

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Fail Fast: {}", config.application.fail_fast);
        println!("  Storage Account: {}", config.storage.account_name);
        println!("  Container: {}", config.storage.container_name);
        println!("  Emulator: {}", config.storage.use_emulator);
        println!("  Source Prefix: {}", layout.prefix());
        println!("  Archive Folder: {}", layout.archive_folder());
        println!("  Skip Prefixes: {:?}", layout.skip_prefixes());
        println!("  Key Field: {}", config.split.key_field);
        println!("  Extract Objects: {:?}", config.split.extract_objects);
        println!("  Tracking Field: {}", config.split.tracking_field);
        println!("  Verify Archive Copy: {}", config.archive.verify_copy);
        println!("  Azure Log Analytics: {}", config.logging.azure_enabled);
        println!();
        Ok(EXIT_SUCCESS)
    }
}
