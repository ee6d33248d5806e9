//! Archival of split originals
//!
//! The object store has no atomic rename, so moving an original into the
//! archive folder is an explicit two-phase transition:
//!
//! 1. [`ArchivalTransition::copy_to_archive`] writes the unmodified bytes to
//!    `{prefix}{archive_folder}/{file_name}`, overwriting any earlier copy
//! 2. [`ArchivalTransition::delete_source`] removes the original
//!
//! Deleting requires the [`ArchiveCopy`] returned by the first phase, so the
//! source can never be deleted before its copy exists. If the process stops
//! between the two phases both objects remain; the next run sees the original
//! again and repeats the split and the copy with identical results. Nothing is
//! rolled back on failure.

use crate::adapters::storage::BlobStore;
use crate::domain::errors::StorageError;
use crate::domain::layout::base_name;
use crate::domain::{SourceLayout, Step, StepContext, StepFailure};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of raw bytes
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Proof that the archive copy of an original was written
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the source is only removed by passing the copy to delete_source"]
pub struct ArchiveCopy {
    source_path: String,
    archive_path: String,
    digest: String,
}

impl ArchiveCopy {
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn archive_path(&self) -> &str {
        &self.archive_path
    }

    /// SHA-256 of the copied bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Original moved into the archive folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReceipt {
    pub source_path: String,
    pub archive_path: String,
    pub verified: bool,
}

/// Moves originals into the archive folder by copy-then-delete
pub struct ArchivalTransition<'a> {
    store: &'a dyn BlobStore,
    layout: &'a SourceLayout,
    verify_copy: bool,
}

impl<'a> ArchivalTransition<'a> {
    pub fn new(store: &'a dyn BlobStore, layout: &'a SourceLayout) -> Self {
        Self {
            store,
            layout,
            verify_copy: false,
        }
    }

    /// Read the copy back and compare digests before deleting the source
    pub fn with_verification(mut self, verify_copy: bool) -> Self {
        self.verify_copy = verify_copy;
        self
    }

    /// Where the original at `source_path` is archived
    pub fn archive_path_for(&self, source_path: &str) -> String {
        self.layout.archive_path(base_name(source_path))
    }

    /// Phase one: writes `content` to the archive path
    ///
    /// # Errors
    ///
    /// Fails at [`Step::ArchiveCopy`] if the upload fails.
    pub async fn copy_to_archive(
        &self,
        source_path: &str,
        content: &[u8],
    ) -> Result<ArchiveCopy, StepFailure> {
        let archive_path = self.archive_path_for(source_path);

        self.store
            .write(&archive_path, content.to_vec())
            .await
            .at_step(Step::ArchiveCopy, &archive_path)?;

        tracing::debug!(source = %source_path, archive = %archive_path, "Archive copy written");

        Ok(ArchiveCopy {
            source_path: source_path.to_string(),
            archive_path,
            digest: sha256_hex(content),
        })
    }

    /// Reads the archive copy back and checks its digest
    ///
    /// # Errors
    ///
    /// Fails at [`Step::VerifyArchive`] if the copy cannot be read or differs.
    pub async fn verify(&self, copy: &ArchiveCopy) -> Result<(), StepFailure> {
        let stored = self
            .store
            .read(&copy.archive_path)
            .await
            .at_step(Step::VerifyArchive, &copy.archive_path)?;

        let actual = sha256_hex(&stored);
        if actual != copy.digest {
            return Err(StepFailure::new(
                Step::VerifyArchive,
                StorageError::VerificationFailed {
                    path: copy.archive_path.clone(),
                    expected: copy.digest.clone(),
                    actual,
                },
            )
            .with_path(copy.archive_path.clone()));
        }

        Ok(())
    }

    /// Phase two: deletes the original
    ///
    /// # Errors
    ///
    /// Fails at [`Step::DeleteSource`]; the archive copy is left in place.
    pub async fn delete_source(&self, copy: ArchiveCopy) -> Result<ArchiveReceipt, StepFailure> {
        self.store
            .delete(&copy.source_path)
            .await
            .at_step(Step::DeleteSource, &copy.source_path)?;

        Ok(ArchiveReceipt {
            source_path: copy.source_path,
            archive_path: copy.archive_path,
            verified: self.verify_copy,
        })
    }

    /// Runs both phases, verifying in between when enabled
    ///
    /// # Errors
    ///
    /// Returns the first failing phase; earlier phases are not undone.
    pub async fn archive(
        &self,
        source_path: &str,
        content: &[u8],
    ) -> Result<ArchiveReceipt, StepFailure> {
        let copy = self.copy_to_archive(source_path, content).await?;
        if self.verify_copy {
            self.verify(&copy).await?;
        }
        self.delete_source(copy).await
    }
}
