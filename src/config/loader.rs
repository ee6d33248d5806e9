//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{SplitConfig, SplitterConfig};
use crate::domain::errors::SplitterError;
use crate::domain::result::Result;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding file values
pub const ENV_PREFIX: &str = "QUOTE_SPLITTER";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`SplitterConfig`]
/// 4. Merges the JSON split file named by `split.config_file`, if any
/// 5. Applies environment variable overrides (QUOTE_SPLITTER_* prefix)
/// 6. Validates the configuration
///
/// # Errors
///
/// Every failure is reported as [`SplitterError::Configuration`].
///
/// # Examples
///
/// ```no_run
/// use quote_splitter::config::loader::load_config;
///
/// let config = load_config("quote-splitter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SplitterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SplitterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SplitterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SplitterConfig = toml::from_str(&contents)
        .map_err(|e| SplitterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    if let Some(split_file) = config.split.config_file.clone() {
        let split_path = resolve_relative(path, &split_file);
        merge_split_file(&mut config.split, &split_path)?;
    }

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SplitterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Split configuration in the JSON shape used by upstream producers
///
/// ```json
/// { "key_field": "QuoteId", "extract_objects": ["Pricing", "Coverage"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SplitFile {
    /// Identifying field, `QuoteId` when absent
    #[serde(default)]
    pub key_field: Option<String>,

    /// Ordered fields to split out
    #[serde(default)]
    pub extract_objects: Vec<String>,
}

/// Reads a JSON split file
///
/// # Errors
///
/// Returns a configuration error if the file is missing or malformed.
pub fn load_split_file(path: impl AsRef<Path>) -> Result<SplitFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        SplitterError::Configuration(format!(
            "Failed to read split configuration {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        SplitterError::Configuration(format!(
            "Failed to parse split configuration {}: {}",
            path.display(),
            e
        ))
    })
}

fn merge_split_file(split: &mut SplitConfig, path: &Path) -> Result<()> {
    let file = load_split_file(path)?;

    if let Some(key_field) = file.key_field {
        split.key_field = key_field;
    }
    split.extract_objects = file.extract_objects;

    tracing::debug!(
        path = %path.display(),
        key_field = %split.key_field,
        extract_objects = ?split.extract_objects,
        "Loaded split configuration file"
    );

    Ok(())
}

/// Resolves `target` against the directory containing `config_path`
fn resolve_relative(config_path: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        return target.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(target))
        .unwrap_or_else(|| target.to_path_buf())
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SplitterError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are passed through untouched
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(SplitterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

/// Applies environment variable overrides using QUOTE_SPLITTER_* prefix
///
/// Environment variables follow the pattern: QUOTE_SPLITTER_<SECTION>_<KEY>
/// For example: QUOTE_SPLITTER_STORAGE_ACCOUNT_NAME, QUOTE_SPLITTER_APPLICATION_DRY_RUN
fn apply_env_overrides(config: &mut SplitterConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_var("APPLICATION", "DRY_RUN") {
        config.application.dry_run = parse_bool("APPLICATION_DRY_RUN", &val)?;
    }
    if let Some(val) = env_var("APPLICATION", "FAIL_FAST") {
        config.application.fail_fast = parse_bool("APPLICATION_FAIL_FAST", &val)?;
    }

    // Storage overrides
    if let Some(val) = env_var("STORAGE", "ACCOUNT_NAME") {
        config.storage.account_name = val;
    }
    if let Some(val) = env_var("STORAGE", "CONTAINER_NAME") {
        config.storage.container_name = val;
    }
    if let Some(val) = env_var("STORAGE", "SOURCE_PREFIX") {
        config.storage.source_prefix = val;
    }
    if let Some(val) = env_var("STORAGE", "TENANT_ID") {
        config.storage.tenant_id = Some(val);
    }
    if let Some(val) = env_var("STORAGE", "CLIENT_ID") {
        config.storage.client_id = Some(val);
    }
    if let Some(val) = env_var("STORAGE", "CLIENT_SECRET") {
        config.storage.client_secret = Some(super::secret_string(val));
    }

    // Split overrides
    if let Some(val) = env_var("SPLIT", "KEY_FIELD") {
        config.split.key_field = val;
    }
    if let Some(val) = env_var("SPLIT", "EXTRACT_OBJECTS") {
        config.split.extract_objects = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Archive overrides
    if let Some(val) = env_var("ARCHIVE", "VERIFY_COPY") {
        config.archive.verify_copy = parse_bool("ARCHIVE_VERIFY_COPY", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_var("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING", "AZURE_ENABLED") {
        config.logging.azure_enabled = parse_bool("LOGGING_AZURE_ENABLED", &val)?;
    }
    if let Some(val) = env_var("LOGGING", "AZURE_CLIENT_SECRET") {
        config.logging.azure_client_secret = Some(super::secret_string(val));
    }

    Ok(())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    value.trim().parse().map_err(|_| {
        SplitterError::Configuration(format!(
            "{ENV_PREFIX}_{name} must be 'true' or 'false', got '{value}'"
        ))
    })
}
