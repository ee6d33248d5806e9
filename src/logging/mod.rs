//! Logging and observability
//!
//! Two layers live here:
//! - process logging through `tracing` ([`init_logging`]), to the console and
//!   optionally a rotating JSON file
//! - run events ([`Event`]) delivered to an [`EventSink`], which may forward
//!   them to `tracing` or Azure Log Analytics
//!
//! # Example
//!
//! ```no_run
//! use quote_splitter::logging::{init_logging, Event, EventSink, TracingSink};
//! use quote_splitter::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! TracingSink.emit(&Event::info("Start", "Starting quote split run"));
//! ```

pub mod azure;
pub mod events;
pub mod structured;

pub use azure::{AzureEventSink, AzureLogger, AzureSinkHandle};
pub use events::{names, Event, EventSink, FanoutSink, MemorySink, Severity, TracingSink};
pub use structured::{init_logging, LoggingGuard};
