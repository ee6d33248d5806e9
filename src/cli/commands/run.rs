//! Run command implementation
//!
//! This module implements the `run` command: one full pass over the source
//! prefix, splitting eligible quotes and archiving the originals.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_PARTIAL, EXIT_STORE, EXIT_SUCCESS};
use crate::adapters::storage::ObjectStoreBlobStore;
use crate::config::{load_config, SplitterConfig};
use crate::core::run::{RunDriver, RunSummary};
use crate::domain::{SplitterError, Step};
use crate::logging::{
    names, AzureEventSink, AzureLogger, AzureSinkHandle, Event, EventSink, FanoutSink,
    TracingSink,
};
use clap::Args;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Dry run mode - split in memory without writing or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Abort the run on the first object that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Read each archive copy back and compare digests before deleting the original
    #[arg(long)]
    pub verify_archive: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        self.execute_with(config_path, Arc::new(TracingSink)).await
    }

    /// Executes with `local` receiving every event, startup failures included
    async fn execute_with(
        &self,
        config_path: &str,
        local: Arc<dyn EventSink>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                local.emit(&startup_failure(Step::LoadConfig, &e));
                return Ok(EXIT_CONFIG);
            }
        };
        self.apply_overrides(&mut config);

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - nothing will be written or deleted");
            println!("🔍 DRY RUN MODE - nothing will be written or deleted");
            println!();
        }

        let mut fanout = FanoutSink::new().with_sink(local);
        let azure = start_azure_sink(&config);
        if let Some((azure_sink, _)) = &azure {
            fanout = fanout.with_sink(azure_sink.clone());
        }
        let sink: Arc<dyn EventSink> = Arc::new(fanout);

        let store = match ObjectStoreBlobStore::from_config(&config.storage) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create object store client");
                eprintln!("Failed to initialize object store: {e}");
                sink.emit(&startup_failure(Step::ConnectStore, &e));
                finish_azure_sink(azure).await;
                return Ok(EXIT_STORE);
            }
        };

        let driver = RunDriver::new(store, config, sink);
        tracing::info!(run_id = %driver.run_id(), prefix = %driver.layout().prefix(), "Executing run");
        let result = driver.run().await;

        finish_azure_sink(azure).await;

        match result {
            Ok(summary) => {
                print_summary(&summary);
                if summary.is_successful() {
                    println!("✅ Run completed successfully!");
                    Ok(EXIT_SUCCESS)
                } else {
                    println!("⚠️  Run completed with failures");
                    Ok(EXIT_PARTIAL)
                }
            }
            Err(failure) => {
                tracing::error!(step = %failure.step, error = %failure.source, "Run aborted");
                eprintln!("Run aborted: {failure}");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn apply_overrides(&self, config: &mut SplitterConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if self.fail_fast {
            tracing::info!("Enabling fail-fast mode from CLI");
            config.application.fail_fast = true;
        }
        if self.verify_archive {
            tracing::info!("Enabling archive verification from CLI");
            config.archive.verify_copy = true;
        }
    }
}

/// Starts Azure Log Analytics delivery when enabled
///
/// A sink that cannot be created is reported and skipped; telemetry never
/// prevents a run.
fn start_azure_sink(config: &SplitterConfig) -> Option<(Arc<AzureEventSink>, AzureSinkHandle)> {
    if !config.logging.azure_enabled {
        return None;
    }

    match AzureLogger::new(&config.logging) {
        Ok(logger) => {
            let (sink, handle) = AzureEventSink::spawn(logger);
            Some((Arc::new(sink), handle))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Azure Log Analytics disabled for this run");
            None
        }
    }
}

/// Flushes pending Azure events before the command returns
async fn finish_azure_sink(azure: Option<(Arc<AzureEventSink>, AzureSinkHandle)>) {
    if let Some((azure_sink, handle)) = azure {
        azure_sink.close();
        handle.finish().await;
    }
}

/// `General Error` for a failure before the run starts
fn startup_failure(step: Step, error: &SplitterError) -> Event {
    Event::error(names::GENERAL_ERROR, "Failed to execute function")
        .with_unit(step.as_str())
        .with_property("error_msg", error.to_string())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Run Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Listed: {}", summary.listed);
    println!("  Eligible: {}", summary.eligible);
    println!("  Split: {}", summary.split);
    println!("  Fragments: {}", summary.fragments_written);
    println!("  Archived: {}", summary.archived);
    println!("  Left in place: {}", summary.left_in_place);
    println!("  Skipped: {}", summary.skipped());
    println!("    Missing key: {}", summary.skipped_missing_key);
    println!("    Already split: {}", summary.skipped_already_split);
    println!(
        "    Archived or output folder: {}",
        summary.skipped_archived + summary.skipped_output_folder
    );
    println!("  Failed: {}", summary.failed());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failures:");
        for (i, failure) in summary.failures.iter().enumerate() {
            if i < 10 {
                println!("  - {} [{}]", failure.path, failure.step);
                println!("    {}", failure.message);
            }
        }
        if summary.failures.len() > 10 {
            println!("  ... and {} more failures", summary.failures.len() - 10);
        }
        println!();
    }
}
