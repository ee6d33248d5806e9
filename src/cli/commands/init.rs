//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "quote-splitter.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing quote-splitter configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your storage account and objects", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET");
                println!("  3. Validate configuration: quote-splitter validate-config");
                println!("  4. Preview a run: quote-splitter run --dry-run");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample configuration with every section documented
    fn generate_config() -> String {
        r#"# Quote Splitter Configuration File
# Splits composite quote documents into per-object fragments

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Split in memory only; write and delete nothing
dry_run = false

# Abort the run on the first object that fails
fail_fast = false

# ============================================================================
# Blob Storage
# ============================================================================
[storage]
account_name = "quotesdatalake"
container_name = "raw"

# Originals are dropped directly under this prefix
source_prefix = "files/sbt/quotes/"

# Folder (under the prefix) receiving processed originals
archive_folder = "Original"

# Sub-prefixes (under the prefix) that are never reprocessed
skip_prefixes = ["Archive", "Original"]

tenant_id = "${AZURE_TENANT_ID}"
client_id = "${AZURE_CLIENT_ID}"
client_secret = "${AZURE_CLIENT_SECRET}"

# Local Azurite emulator (no credentials needed)
# use_emulator = true

# ============================================================================
# Splitting
# ============================================================================
[split]
# Field identifying a quote; documents without a value are skipped
key_field = "QuoteId"

# Top-level objects written as separate fragments, in order
extract_objects = ["Pricing", "Coverage"]

# Copied into every fragment when present in the quote
tracking_field = "Tracking"

# Alternatively read key_field and extract_objects from a JSON file
# config_file = "split.json"

[archive]
# Read the archive copy back and compare digests before deleting the original
verify_copy = false

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging
local_enabled = false

# Local log directory
local_path = "/var/log/quote-splitter"

# Log rotation (daily, hourly or never)
local_rotation = "daily"

# Azure Log Analytics (optional)
# Requires Azure AD App Registration and Data Collection Rule (DCR)
azure_enabled = false
# azure_tenant_id = "${AZURE_TENANT_ID}"
# azure_client_id = "${AZURE_CLIENT_ID}"
# azure_client_secret = "${AZURE_CLIENT_SECRET}"
# azure_dcr_immutable_id = "${AZURE_DCR_IMMUTABLE_ID}"
# azure_dce_endpoint = "${AZURE_DCE_ENDPOINT}"
# azure_stream_name = "Custom-QuoteSplitter_CL"
"#
        .to_string()
    }
}
