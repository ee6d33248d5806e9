//! Object store integration
//!
//! - [`traits`] - the [`BlobStore`] interface the run driver depends on
//! - [`blob`] - Azure Blob Storage implementation over `object_store`

pub mod blob;
pub mod traits;

pub use blob::ObjectStoreBlobStore;
pub use traits::BlobStore;
