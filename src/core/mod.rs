//! Core splitting logic.
//!
//! # Modules
//!
//! - [`classify`] - decides from a path alone whether an object is an unprocessed original
//! - [`split`] - turns one quote document into per-object fragments
//! - [`archive`] - copy-then-delete move of split originals
//! - [`run`] - the run driver and its summary
//!
//! # Run Workflow
//!
//! 1. **List**: enumerate every object under the source prefix
//! 2. **Classify**: skip archived objects, output folders and fragment-shaped names
//! 3. **Split**: read each eligible original and write one fragment per configured object
//! 4. **Archive**: copy the original to the archive folder, then delete it
//! 5. **Report**: emit events and return a [`run::RunSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use quote_splitter::adapters::storage::ObjectStoreBlobStore;
//! use quote_splitter::config::load_config;
//! use quote_splitter::core::run::RunDriver;
//! use quote_splitter::logging::TracingSink;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quote-splitter.toml")?;
//! let store = Arc::new(ObjectStoreBlobStore::from_config(&config.storage)?);
//!
//! let driver = RunDriver::new(store, config, Arc::new(TracingSink));
//! let summary = driver.run().await?;
//!
//! println!("Archived: {}", summary.archived);
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod classify;
pub mod run;
pub mod split;
