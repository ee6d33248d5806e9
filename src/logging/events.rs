//! Structured run events and the sinks that receive them
//!
//! Every meaningful step of a run is reported as an [`Event`] with a name, a
//! message, a [`Severity`] and structured properties. Sinks are
//! fire-and-forget: [`EventSink::emit`] never blocks on the network and
//! never fails, so telemetry problems cannot affect the run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event names emitted by the run driver
pub mod names {
    pub const START: &str = "Start";
    pub const SPLIT_SKIPPED: &str = "split_quote_skipped";
    pub const SPLIT_SUCCESS: &str = "quote_split_success";
    pub const MOVED_TO_ORIGINAL: &str = "quote_moved_to_original";
    pub const LEFT_IN_PLACE: &str = "quote_left_in_place";
    pub const PROCESSING_FAILED: &str = "quote_processing_failed";
    pub const RUN_COMPLETED: &str = "run_completed";
    pub const GENERAL_ERROR: &str = "General Error";
}

/// A structured telemetry event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    pub message: String,
    pub severity: Severity,
    /// Logical step the event relates to
    pub unit: Option<String>,
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub run_id: Option<Uuid>,
}

impl Event {
    pub fn new(name: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            severity,
            unit: None,
            properties: Map::new(),
            timestamp: Utc::now(),
            run_id: None,
        }
    }

    pub fn info(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, Severity::Info)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, Severity::Warning)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, Severity::Error)
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Property value as a string, if present and a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Receiver of run events
pub trait EventSink: Send + Sync {
    /// Records an event; must not block or fail
    fn emit(&self, event: &Event);
}

/// Writes events through `tracing` at the matching level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event) {
        let unit = event.unit.as_deref().unwrap_or("");
        let properties = Value::Object(event.properties.clone());
        let run_id = event.run_id.map(|id| id.to_string()).unwrap_or_default();

        match event.severity {
            Severity::Debug => tracing::debug!(
                event = %event.name, unit = unit, run_id = %run_id, properties = %properties,
                "{}", event.message
            ),
            Severity::Info => tracing::info!(
                event = %event.name, unit = unit, run_id = %run_id, properties = %properties,
                "{}", event.message
            ),
            Severity::Warning => tracing::warn!(
                event = %event.name, unit = unit, run_id = %run_id, properties = %properties,
                "{}", event.message
            ),
            Severity::Error | Severity::Critical => tracing::error!(
                event = %event.name, severity = %event.severity, unit = unit, run_id = %run_id,
                properties = %properties, "{}", event.message
            ),
        }
    }
}

/// Forwards every event to several sinks
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &Event) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

/// Keeps events in memory, for tests and dry-run reports
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Names of recorded events, in order
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }

    /// Recorded events with the given name
    pub fn named(&self, name: &str) -> Vec<Event> {
        self.events().into_iter().filter(|e| e.name == name).collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let run_id = Uuid::new_v4();
        let event = Event::warning(names::SPLIT_SKIPPED, "Key field missing")
            .with_unit("split")
            .with_property("blob_name", "files/sbt/quotes/1_Q1.json")
            .with_property("fragments", 0)
            .with_run_id(run_id);

        assert_eq!(event.severity, Severity::Warning);
        assert_eq!(event.unit.as_deref(), Some("split"));
        assert_eq!(event.property_str("blob_name"), Some("files/sbt/quotes/1_Q1.json"));
        assert_eq!(event.properties["fragments"], 0);
        assert_eq!(event.run_id, Some(run_id));
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        let value = serde_json::to_value(Severity::Warning).unwrap();
        assert_eq!(value, "WARNING");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(&Event::info(names::START, "Starting"));
        sink.emit(&Event::error(names::GENERAL_ERROR, "Failed"));

        assert_eq!(sink.names(), [names::START, names::GENERAL_ERROR]);
        assert_eq!(sink.named(names::GENERAL_ERROR).len(), 1);
    }

    #[test]
    fn test_fanout_sink_forwards_to_all() {
        let first = Arc::new(MemorySink::new());
        let second = Arc::new(MemorySink::new());
        let fanout = FanoutSink::new()
            .with_sink(first.clone())
            .with_sink(second.clone())
            .with_sink(Arc::new(TracingSink));

        fanout.emit(&Event::info(names::RUN_COMPLETED, "done"));

        assert_eq!(fanout.len(), 3);
        assert_eq!(first.names(), [names::RUN_COMPLETED]);
        assert_eq!(second.names(), [names::RUN_COMPLETED]);
    }
}
