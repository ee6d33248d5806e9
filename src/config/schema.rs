//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use crate::domain::SourceLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Blob container holding the quotes
    pub storage: StorageConfig,

    /// How documents are split
    pub split: SplitConfig,

    /// Archival of processed originals
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SplitterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.split.validate(&self.storage.archive_folder)?;
        self.logging.validate()?;
        Ok(())
    }

    /// Layout of the source namespace described by the storage section
    pub fn layout(&self) -> SourceLayout {
        SourceLayout::new(
            self.storage.source_prefix.clone(),
            self.storage.archive_folder.clone(),
            self.storage.skip_prefixes.clone(),
        )
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (split in memory, never write or delete)
    #[serde(default)]
    pub dry_run: bool,

    /// Abort the whole run on the first per-object failure
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
            fail_fast: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Azure Blob Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage account name
    pub account_name: String,

    /// Container (file system) name
    pub container_name: String,

    /// Prefix under which originals are dropped
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Folder (relative to the prefix) receiving archived originals
    #[serde(default = "default_archive_folder")]
    pub archive_folder: String,

    /// Sub-prefixes (relative to the prefix) that are never reprocessed
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,

    /// Azure AD tenant ID
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Azure AD client ID (from App Registration)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Azure AD client secret (from App Registration)
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Custom blob endpoint (e.g. a private link URL)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Use the local Azurite emulator
    #[serde(default)]
    pub use_emulator: bool,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.account_name.trim().is_empty() {
            return Err("storage.account_name cannot be empty".to_string());
        }
        if self.container_name.trim().is_empty() {
            return Err("storage.container_name cannot be empty".to_string());
        }
        if self.source_prefix.trim_matches('/').is_empty() {
            return Err("storage.source_prefix cannot be empty".to_string());
        }
        if self.archive_folder.is_empty() || self.archive_folder.contains('/') {
            return Err(format!(
                "storage.archive_folder '{}' must be a single non-empty folder name",
                self.archive_folder
            ));
        }

        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| format!("storage.endpoint '{endpoint}' is not a valid URL: {e}"))?;
        }

        if !self.use_emulator {
            let has_secret = self
                .client_secret
                .as_ref()
                .map(|s| !s.expose_secret().is_empty())
                .unwrap_or(false);
            if self.tenant_id.is_none() || self.client_id.is_none() || !has_secret {
                return Err(
                    "storage.tenant_id, storage.client_id and storage.client_secret are required"
                        .to_string(),
                );
            }
        }

        Ok(())
    }
}

/// Split configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Name of the document's identifying field
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Ordered top-level field names to split out
    #[serde(default)]
    pub extract_objects: Vec<String>,

    /// Field copied into every fragment when present in the source
    #[serde(default = "default_tracking_field")]
    pub tracking_field: String,

    /// Optional JSON file supplying `key_field` and `extract_objects`
    #[serde(default)]
    pub config_file: Option<String>,
}

impl SplitConfig {
    /// Creates a split configuration with the default tracking field
    pub fn new(key_field: impl Into<String>, extract_objects: Vec<String>) -> Self {
        Self {
            key_field: key_field.into(),
            extract_objects,
            tracking_field: default_tracking_field(),
            config_file: None,
        }
    }

    /// Whether `name` is one of the configured extract objects
    pub fn is_extract_object(&self, name: &str) -> bool {
        self.extract_objects.iter().any(|o| o == name)
    }

    pub(crate) fn validate(&self, archive_folder: &str) -> Result<(), String> {
        if self.key_field.trim().is_empty() {
            return Err("split.key_field cannot be empty".to_string());
        }
        if self.extract_objects.is_empty() {
            return Err("split.extract_objects must name at least one object".to_string());
        }

        let mut seen = HashSet::new();
        for name in &self.extract_objects {
            if name.trim().is_empty() {
                return Err("split.extract_objects cannot contain empty names".to_string());
            }
            if name.contains('/') {
                return Err(format!(
                    "split.extract_objects entry '{name}' cannot contain '/'"
                ));
            }
            if name.eq_ignore_ascii_case(archive_folder) {
                return Err(format!(
                    "split.extract_objects entry '{name}' collides with the archive folder"
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("split.extract_objects contains '{name}' twice"));
            }
        }

        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::new(default_key_field(), Vec::new())
    }
}

/// Archive configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Read the archive copy back and compare digests before deleting the source
    #[serde(default)]
    pub verify_copy: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Enable Azure Log Analytics
    #[serde(default)]
    pub azure_enabled: bool,

    /// Azure AD tenant ID
    #[serde(default)]
    pub azure_tenant_id: Option<String>,

    /// Azure AD client ID (from App Registration)
    #[serde(default)]
    pub azure_client_id: Option<String>,

    /// Azure AD client secret (from App Registration)
    #[serde(default)]
    pub azure_client_secret: Option<SecretString>,

    /// Data Collection Rule (DCR) immutable ID
    #[serde(default)]
    pub azure_dcr_immutable_id: Option<String>,

    /// Data Collection Endpoint (DCE) URL
    #[serde(default)]
    pub azure_dce_endpoint: Option<String>,

    /// Stream name for custom logs (e.g., "Custom-QuoteSplitter_CL")
    #[serde(default)]
    pub azure_stream_name: Option<String>,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.azure_enabled {
            if self.azure_tenant_id.is_none() {
                return Err("Azure logging enabled but azure_tenant_id not provided".to_string());
            }
            if self.azure_client_id.is_none() {
                return Err("Azure logging enabled but azure_client_id not provided".to_string());
            }
            if self.azure_client_secret.is_none() {
                return Err(
                    "Azure logging enabled but azure_client_secret not provided".to_string()
                );
            }
            if self.azure_dcr_immutable_id.is_none() {
                return Err(
                    "Azure logging enabled but azure_dcr_immutable_id not provided".to_string(),
                );
            }
            match &self.azure_dce_endpoint {
                None => {
                    return Err(
                        "Azure logging enabled but azure_dce_endpoint not provided".to_string()
                    )
                }
                Some(endpoint) => {
                    url::Url::parse(endpoint).map_err(|e| {
                        format!("logging.azure_dce_endpoint '{endpoint}' is not a valid URL: {e}")
                    })?;
                }
            }
            if self.azure_stream_name.is_none() {
                return Err("Azure logging enabled but azure_stream_name not provided".to_string());
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            azure_enabled: false,
            azure_tenant_id: None,
            azure_client_id: None,
            azure_client_secret: None,
            azure_dcr_immutable_id: None,
            azure_dce_endpoint: None,
            azure_stream_name: None,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_prefix() -> String {
    "files/sbt/quotes/".to_string()
}

fn default_archive_folder() -> String {
    "Original".to_string()
}

fn default_skip_prefixes() -> Vec<String> {
    vec!["Archive".to_string(), "Original".to_string()]
}

fn default_key_field() -> String {
    "QuoteId".to_string()
}

fn default_tracking_field() -> String {
    "Tracking".to_string()
}

fn default_local_path() -> String {
    "/var/log/quote-splitter".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn storage_config() -> StorageConfig {
        StorageConfig {
            account_name: "quotesacct".to_string(),
            container_name: "datalake".to_string(),
            source_prefix: default_source_prefix(),
            archive_folder: default_archive_folder(),
            skip_prefixes: default_skip_prefixes(),
            tenant_id: Some("tenant".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some(secret_string("secret".to_string())),
            endpoint: None,
            use_emulator: false,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_config_validation() {
        let mut config = storage_config();
        assert!(config.validate().is_ok());

        config.container_name = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = storage_config();
        config.source_prefix = "/".to_string();
        assert!(config.validate().is_err());

        let mut config = storage_config();
        config.archive_folder = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_requires_credentials_unless_emulated() {
        let mut config = storage_config();
        config.client_secret = None;
        assert!(config.validate().is_err());

        config.use_emulator = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_endpoint_must_be_url() {
        let mut config = storage_config();
        config.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.endpoint = Some("https://quotesacct.blob.core.windows.net".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_config_validation() {
        let config = SplitConfig::new("QuoteId", vec!["Pricing".to_string()]);
        assert!(config.validate("Original").is_ok());

        let config = SplitConfig::new("QuoteId", vec![]);
        assert!(config.validate("Original").is_err());

        let config = SplitConfig::new("", vec!["Pricing".to_string()]);
        assert!(config.validate("Original").is_err());

        let config = SplitConfig::new("QuoteId", vec!["Pricing".to_string(), "Pricing".to_string()]);
        assert!(config.validate("Original").is_err());

        let config = SplitConfig::new("QuoteId", vec!["original".to_string()]);
        assert!(config.validate("Original").is_err());

        let config = SplitConfig::new("QuoteId", vec!["Pricing/Detail".to_string()]);
        assert!(config.validate("Original").is_err());
    }

    #[test]
    fn test_split_config_defaults() {
        let config = SplitConfig::default();
        assert_eq!(config.key_field, "QuoteId");
        assert_eq!(config.tracking_field, "Tracking");
        assert!(config.extract_objects.is_empty());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_rotation, "daily");
        assert!(!config.azure_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_azure_requires_fields() {
        let mut config = LoggingConfig {
            azure_enabled: true,
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());

        config.azure_tenant_id = Some("tenant".to_string());
        config.azure_client_id = Some("client".to_string());
        config.azure_client_secret = Some(secret_string("secret".to_string()));
        config.azure_dcr_immutable_id = Some("dcr-123".to_string());
        config.azure_dce_endpoint = Some("https://dce.ingest.monitor.azure.com".to_string());
        config.azure_stream_name = Some("Custom-QuoteSplitter_CL".to_string());
        assert!(config.validate().is_ok());

        config.azure_dce_endpoint = Some("dce".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_from_config() {
        let config = SplitterConfig {
            application: ApplicationConfig::default(),
            storage: storage_config(),
            split: SplitConfig::new("QuoteId", vec!["Pricing".to_string()]),
            archive: ArchiveConfig::default(),
            logging: LoggingConfig::default(),
        };
        assert!(config.validate().is_ok());

        let layout = config.layout();
        assert_eq!(layout.prefix(), "files/sbt/quotes/");
        assert_eq!(layout.archive_folder(), "Original");
    }
}
