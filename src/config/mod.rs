//! Configuration management.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides (`QUOTE_SPLITTER_<SECTION>_<KEY>`)
//! - A legacy JSON split file (`split.config_file`)
//! - Default values for optional settings
//! - Validation before any object is touched
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quote_splitter::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quote-splitter.toml")?;
//! println!("Container: {}", config.storage.container_name);
//! println!("Extract objects: {:?}", config.split.extract_objects);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! account_name = "quotesdatalake"
//! container_name = "raw"
//! source_prefix = "files/sbt/quotes/"
//! tenant_id = "${AZURE_TENANT_ID}"
//! client_id = "${AZURE_CLIENT_ID}"
//! client_secret = "${AZURE_CLIENT_SECRET}"
//!
//! [split]
//! key_field = "QuoteId"
//! extract_objects = ["Pricing", "Coverage"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_split_file, SplitFile};
pub use schema::{
    ApplicationConfig, ArchiveConfig, LoggingConfig, SplitConfig, SplitterConfig, StorageConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
