//! Azure Blob Storage client built on the `object_store` crate
//!
//! The same adapter wraps any [`ObjectStore`] implementation, which lets the
//! run driver be exercised against `object_store::memory::InMemory` in tests.

use super::traits::BlobStore;
use crate::config::StorageConfig;
use crate::domain::errors::StorageError;
use crate::domain::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use secrecy::ExposeSecret;
use std::sync::Arc;

/// [`BlobStore`] backed by an `object_store` implementation
#[derive(Debug, Clone)]
pub struct ObjectStoreBlobStore {
    inner: Arc<dyn ObjectStore>,
    container: String,
}

impl ObjectStoreBlobStore {
    /// Wraps an existing object store
    pub fn new(inner: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            inner,
            container: container.into(),
        }
    }

    /// An empty in-process store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    /// Builds an Azure Blob Storage client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the client cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(config.account_name.clone())
            .with_container_name(config.container_name.clone());

        if config.use_emulator {
            builder = builder.with_use_emulator(true);
        } else {
            let tenant_id = config.tenant_id.clone().ok_or_else(|| {
                StorageError::ConnectionFailed("storage.tenant_id is required".to_string())
            })?;
            let client_id = config.client_id.clone().ok_or_else(|| {
                StorageError::ConnectionFailed("storage.client_id is required".to_string())
            })?;
            let client_secret = config.client_secret.as_ref().ok_or_else(|| {
                StorageError::ConnectionFailed("storage.client_secret is required".to_string())
            })?;

            builder = builder
                .with_tenant_id(tenant_id)
                .with_client_id(client_id)
                .with_client_secret(client_secret.expose_secret().as_ref().to_string());
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint.clone());
        }

        let store = builder.build().map_err(|e| {
            StorageError::ConnectionFailed(format!(
                "Failed to create blob client for {}/{}: {}",
                config.account_name, config.container_name, e
            ))
        })?;

        tracing::info!(
            account = %config.account_name,
            container = %config.container_name,
            emulator = config.use_emulator,
            "Blob storage client initialized"
        );

        Ok(Self::new(Arc::new(store), config.container_name.clone()))
    }

    /// Name of the container this client talks to
    pub fn container(&self) -> &str {
        &self.container
    }
}

fn object_path(path: &str) -> std::result::Result<ObjectPath, StorageError> {
    ObjectPath::parse(path).map_err(|e| StorageError::InvalidPath {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl BlobStore for ObjectStoreBlobStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix_path = ObjectPath::from(prefix);

        let metas: Vec<_> = self
            .inner
            .list(Some(&prefix_path))
            .try_collect()
            .await
            .map_err(|e| StorageError::ListFailed {
                prefix: prefix.to_string(),
                message: e.to_string(),
            })?;

        let mut paths: Vec<String> = metas
            .into_iter()
            .map(|meta| meta.location.to_string())
            .filter(|location| location.starts_with(prefix))
            .collect();
        paths.sort();

        tracing::debug!(prefix = %prefix, count = paths.len(), "Listed objects");
        Ok(paths)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let location = object_path(path)?;

        let result = self.inner.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(path.to_string()),
            other => StorageError::ReadFailed {
                path: path.to_string(),
                message: other.to_string(),
            },
        })?;

        let bytes = result.bytes().await.map_err(|e| StorageError::ReadFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }

    async fn write(&self, path: &str, content: Vec<u8>) -> Result<()> {
        let location = object_path(path)?;

        self.inner
            .put(&location, PutPayload::from(content))
            .await
            .map_err(|e| StorageError::WriteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let location = object_path(path)?;

        self.inner
            .delete(&location)
            .await
            .map_err(|e| StorageError::DeleteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::SplitterError;

    #[tokio::test]
    async fn test_write_read_overwrite() {
        let store = ObjectStoreBlobStore::in_memory();
        store
            .write("files/sbt/quotes/1_Q1.json", b"first".to_vec())
            .await
            .unwrap();
        store
            .write("files/sbt/quotes/1_Q1.json", b"second".to_vec())
            .await
            .unwrap();

        let content = store.read("files/sbt/quotes/1_Q1.json").await.unwrap();
        assert_eq!(content, b"second");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_prefix() {
        let store = ObjectStoreBlobStore::in_memory();
        for path in [
            "files/sbt/quotes/2_Q2.json",
            "files/sbt/quotes/Pricing/1_Q1_Pricing.json",
            "files/sbt/other/3_Q3.json",
        ] {
            store.write(path, b"{}".to_vec()).await.unwrap();
        }

        let paths = store.list("files/sbt/quotes/").await.unwrap();
        assert_eq!(
            paths,
            [
                "files/sbt/quotes/2_Q2.json",
                "files/sbt/quotes/Pricing/1_Q1_Pricing.json"
            ]
        );
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let store = ObjectStoreBlobStore::in_memory();
        let err = store.read("files/sbt/quotes/missing.json").await.unwrap_err();
        assert!(matches!(
            err,
            SplitterError::Storage(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let store = ObjectStoreBlobStore::in_memory();
        store
            .write("files/sbt/quotes/1_Q1.json", b"{}".to_vec())
            .await
            .unwrap();
        store.delete("files/sbt/quotes/1_Q1.json").await.unwrap();

        assert!(store.list("files/sbt/quotes/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_path_rejected() {
        let store = ObjectStoreBlobStore::in_memory();
        let err = store.write("files/../quotes.json", b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(
            err,
            SplitterError::Storage(StorageError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_from_config_builds_client() {
        let config = StorageConfig {
            account_name: "quotesacct".to_string(),
            container_name: "datalake".to_string(),
            source_prefix: "files/sbt/quotes/".to_string(),
            archive_folder: "Original".to_string(),
            skip_prefixes: vec![],
            tenant_id: Some("tenant".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some(secret_string("secret".to_string())),
            endpoint: None,
            use_emulator: false,
        };

        let store = ObjectStoreBlobStore::from_config(&config).unwrap();
        assert_eq!(store.container(), "datalake");
    }
}
