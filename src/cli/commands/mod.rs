//! CLI command implementations
//!
//! Exit codes: 0 success, 1 completed with per-object failures,
//! 2 configuration error, 4 object store initialisation error, 5 fatal error.

pub mod init;
pub mod run;
pub mod validate;

/// Run completed without failures
pub const EXIT_SUCCESS: i32 = 0;
/// Run completed but some objects failed
pub const EXIT_PARTIAL: i32 = 1;
/// Configuration missing or invalid
pub const EXIT_CONFIG: i32 = 2;
/// Object store client could not be created
pub const EXIT_STORE: i32 = 4;
/// Run aborted
pub const EXIT_FATAL: i32 = 5;
