//! Result type alias
//!
//! This module provides a convenient Result type alias that uses
//! `SplitterError` as the error type.

use super::errors::SplitterError;

/// Result type alias for splitter operations
///
/// # Examples
///
/// ```
/// use quote_splitter::domain::result::Result;
/// use quote_splitter::domain::errors::SplitterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SplitterError::Configuration("missing key_field".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SplitterError>;
