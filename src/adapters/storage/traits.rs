//! Object store abstraction
//!
//! The splitter only needs four operations on a flat namespace of named
//! binary objects. Paths are plain strings with `/` as a conventional
//! separator; there is no directory concept.

use crate::domain::Result;
use async_trait::async_trait;

/// Object store client used by the run driver
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Lists the paths of all objects whose name starts with `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be completed.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Reads the full content of an object
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing or cannot be downloaded.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Writes an object, replacing any existing object at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    async fn write(&self, path: &str, content: Vec<u8>) -> Result<()>;

    /// Deletes an object
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be deleted.
    async fn delete(&self, path: &str) -> Result<()>;
}
