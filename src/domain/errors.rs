//! Domain error types
//!
//! This module defines the error hierarchy for the splitter.
//! All errors are domain-specific and don't expose third-party types.

use std::fmt;
use thiserror::Error;

/// Main splitter error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Object store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored object content could not be parsed as a quote document
    #[error("Content error in {path}: {message}")]
    Content { path: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Azure logging errors
    #[error("Azure logging error: {0}")]
    AzureLogging(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Object store errors
///
/// Errors that occur when talking to the blob container.
/// These errors don't expose the underlying SDK types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to build a client for the container
    #[error("Failed to connect to object store: {0}")]
    ConnectionFailed(String),

    /// The object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Listing the namespace failed
    #[error("Failed to list objects under {prefix}: {message}")]
    ListFailed { prefix: String, message: String },

    /// Reading an object failed
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    /// Writing an object failed
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    /// Deleting an object failed
    #[error("Failed to delete {path}: {message}")]
    DeleteFailed { path: String, message: String },

    /// A read-back copy does not match what was written
    #[error("Copy at {path} does not match the source (expected sha256 {expected}, found {actual})")]
    VerificationFailed {
        path: String,
        expected: String,
        actual: String,
    },

    /// The path is not a valid object name
    #[error("Invalid object path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}

/// Logical step of a run, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Loading and validating the configuration
    LoadConfig,
    /// Building the object store client
    ConnectStore,
    /// Enumerating the source namespace
    ListObjects,
    /// Downloading an eligible original
    ReadObject,
    /// Parsing the original as a quote document
    ParseDocument,
    /// Uploading a fragment document
    WriteFragment,
    /// Copying the original to the archive folder
    ArchiveCopy,
    /// Reading back the archive copy for verification
    VerifyArchive,
    /// Deleting the original from its source path
    DeleteSource,
}

impl Step {
    /// Stable name used in log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::LoadConfig => "load_config",
            Step::ConnectStore => "connect_store",
            Step::ListObjects => "list_objects",
            Step::ReadObject => "read_object",
            Step::ParseDocument => "parse_document",
            Step::WriteFragment => "write_fragment",
            Step::ArchiveCopy => "archive_copy",
            Step::VerifyArchive => "verify_archive",
            Step::DeleteSource => "delete_source",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure attributed to the step that produced it
#[derive(Debug, Error)]
#[error("[{step}] {source}")]
pub struct StepFailure {
    /// Step that failed
    pub step: Step,

    /// Object being processed, if any
    pub path: Option<String>,

    /// Underlying cause
    #[source]
    pub source: SplitterError,
}

impl StepFailure {
    /// Creates a new step failure
    pub fn new(step: Step, source: impl Into<SplitterError>) -> Self {
        Self {
            step,
            path: None,
            source: source.into(),
        }
    }

    /// Sets the object path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Extension for attaching a step to fallible results
pub trait StepContext<T> {
    /// Wraps the error in a [`StepFailure`] for `step` and `path`
    fn at_step(self, step: Step, path: &str) -> std::result::Result<T, StepFailure>;
}

impl<T, E> StepContext<T> for std::result::Result<T, E>
where
    E: Into<SplitterError>,
{
    fn at_step(self, step: Step, path: &str) -> std::result::Result<T, StepFailure> {
        self.map_err(|e| StepFailure::new(step, e).with_path(path))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SplitterError {
    fn from(err: std::io::Error) -> Self {
        SplitterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SplitterError {
    fn from(err: serde_json::Error) -> Self {
        SplitterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SplitterError {
    fn from(err: toml::de::Error) -> Self {
        SplitterError::Configuration(format!("TOML parse error: {err}"))
    }
}
