// Quote Splitter - Composite quote documents to per-object fragments
// Copyright (c) 2025 Quote Splitter Contributors
// Licensed under the MIT License

//! # Quote Splitter
//!
//! Splits composite quote documents stored in Azure Blob Storage into
//! per-object fragment documents, then archives the originals.
//!
//! ## Overview
//!
//! For every original under the source prefix (`files/sbt/quotes/` by default):
//! - **Classify** the path: archived objects, output folders and
//!   fragment-shaped names are never reprocessed
//! - **Split** the document: one fragment per configured top-level object,
//!   each carrying the key field and the tracking object
//! - **Archive** the original by copy-then-delete into the archive folder,
//!   but only if at least one fragment was written
//!
//! ```text
//! files/sbt/quotes/20240101_Q1.json
//!   -> files/sbt/quotes/Pricing/20240101_Q1_Pricing.json
//!   -> files/sbt/quotes/Coverage/20240101_Q1_Coverage.json
//!   -> files/sbt/quotes/Original/20240101_Q1.json
//! ```
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Classification, splitting, archival and the run driver
//! - [`adapters`] - Object store integration
//! - [`domain`] - Documents, object naming, outcomes and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and run events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quote_splitter::adapters::storage::ObjectStoreBlobStore;
//! use quote_splitter::config::load_config;
//! use quote_splitter::core::run::RunDriver;
//! use quote_splitter::logging::TracingSink;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("quote-splitter.toml")?;
//!     let store = Arc::new(ObjectStoreBlobStore::from_config(&config.storage)?);
//!
//!     let summary = RunDriver::new(store, config, Arc::new(TracingSink)).run().await?;
//!
//!     println!("Split {} quotes into {} fragments", summary.split, summary.fragments_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::SplitterError`]. Failures during a run
//! are wrapped in [`domain::StepFailure`], naming the step that failed. One
//! failing object does not stop the run unless `application.fail_fast` is set.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
