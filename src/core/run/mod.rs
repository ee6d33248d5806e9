//! Run orchestration
//!
//! - [`driver`] - one pass over the source namespace
//! - [`summary`] - per-run counts and failures

pub mod driver;
pub mod summary;

pub use driver::RunDriver;
pub use summary::{ObjectFailure, RunSummary};
