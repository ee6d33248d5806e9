//! Domain models and types for the quote splitter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Documents** ([`QuoteDocument`], [`FragmentDocument`])
//! - **Object naming** ([`SourceLayout`], [`FileNameParts`])
//! - **Outcomes** ([`ProcessingOutcome`], [`SkipReason`])
//! - **Error types** ([`SplitterError`], [`StorageError`], [`StepFailure`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SplitterError>`]:
//!
//! ```rust
//! use quote_splitter::domain::{QuoteDocument, Result};
//!
//! fn example() -> Result<()> {
//!     let doc = QuoteDocument::parse("files/sbt/quotes/1_Q1.json", br#"{"QuoteId":"Q1"}"#)?;
//!     assert!(doc.key_value("QuoteId").is_some());
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod errors;
pub mod layout;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{FragmentDocument, QuoteDocument};
pub use errors::{SplitterError, Step, StepContext, StepFailure, StorageError};
pub use layout::{FileNameParts, SourceLayout};
pub use outcome::{ProcessingOutcome, SkipReason};
pub use result::Result;
