//! External system integrations.
//!
//! - [`storage`] - object store abstraction and the Azure Blob Storage client
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The core only sees the
//! [`storage::BlobStore`] trait.
//!
//! ```rust,no_run
//! use quote_splitter::adapters::storage::{BlobStore, ObjectStoreBlobStore};
//! use quote_splitter::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quote-splitter.toml")?;
//! let store = ObjectStoreBlobStore::from_config(&config.storage)?;
//! let paths = store.list(&config.storage.source_prefix).await?;
//! println!("{} objects", paths.len());
//! # Ok(())
//! # }
//! ```

pub mod storage;
