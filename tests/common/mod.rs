//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use quote_splitter::adapters::storage::{BlobStore, ObjectStoreBlobStore};
use quote_splitter::config::{
    ApplicationConfig, ArchiveConfig, LoggingConfig, SplitConfig, SplitterConfig, StorageConfig,
};
use quote_splitter::domain::{Result, StorageError};
use serde_json::Value;

pub const PREFIX: &str = "files/sbt/quotes/";

/// Configuration for the default layout with the given extract objects
pub fn config(extract_objects: &[&str]) -> SplitterConfig {
    SplitterConfig {
        application: ApplicationConfig::default(),
        storage: StorageConfig {
            account_name: "quotesdatalake".to_string(),
            container_name: "raw".to_string(),
            source_prefix: PREFIX.to_string(),
            archive_folder: "Original".to_string(),
            skip_prefixes: vec!["Archive".to_string(), "Original".to_string()],
            tenant_id: None,
            client_id: None,
            client_secret: None,
            endpoint: None,
            use_emulator: true,
        },
        split: SplitConfig::new(
            "QuoteId",
            extract_objects.iter().map(|o| o.to_string()).collect(),
        ),
        archive: ArchiveConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Full path of an object under the source prefix
pub fn path(relative: &str) -> String {
    format!("{PREFIX}{relative}")
}

pub async fn put_json(store: &dyn BlobStore, relative: &str, value: &Value) {
    store
        .write(&path(relative), serde_json::to_vec(value).unwrap())
        .await
        .unwrap();
}

pub async fn read_json(store: &dyn BlobStore, relative: &str) -> Value {
    serde_json::from_slice(&store.read(&path(relative)).await.unwrap()).unwrap()
}

pub async fn exists(store: &dyn BlobStore, relative: &str) -> bool {
    store.read(&path(relative)).await.is_ok()
}

/// In-memory store that fails selected operations
pub struct FailingStore {
    pub inner: ObjectStoreBlobStore,
    pub fail_list: bool,
    pub fail_read_containing: Option<String>,
    pub fail_write_containing: Option<String>,
    pub fail_delete_containing: Option<String>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: ObjectStoreBlobStore::in_memory(),
            fail_list: false,
            fail_read_containing: None,
            fail_write_containing: None,
            fail_delete_containing: None,
        }
    }
}

fn matches(pattern: &Option<String>, path: &str) -> bool {
    pattern.as_deref().is_some_and(|p| path.contains(p))
}

#[async_trait]
impl BlobStore for FailingStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        if self.fail_list {
            return Err(StorageError::ListFailed {
                prefix: prefix.to_string(),
                message: "injected".to_string(),
            }
            .into());
        }
        self.inner.list(prefix).await
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        if matches(&self.fail_read_containing, path) {
            return Err(StorageError::ReadFailed {
                path: path.to_string(),
                message: "injected".to_string(),
            }
            .into());
        }
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, content: Vec<u8>) -> Result<()> {
        if matches(&self.fail_write_containing, path) {
            return Err(StorageError::WriteFailed {
                path: path.to_string(),
                message: "injected".to_string(),
            }
            .into());
        }
        self.inner.write(path, content).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        if matches(&self.fail_delete_containing, path) {
            return Err(StorageError::DeleteFailed {
                path: path.to_string(),
                message: "injected".to_string(),
            }
            .into());
        }
        self.inner.delete(path).await
    }
}
