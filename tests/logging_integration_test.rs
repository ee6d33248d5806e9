//! Integration tests for logging functionality

use quote_splitter::config::{secret_string, LoggingConfig};
use quote_splitter::logging::{
    names, AzureEventSink, AzureLogger, Event, EventSink, FanoutSink, MemorySink, Severity,
    TracingSink,
};
use std::sync::Arc;
use tempfile::TempDir;

fn azure_config() -> LoggingConfig {
    LoggingConfig {
        azure_enabled: true,
        azure_tenant_id: Some("test-tenant-id".to_string()),
        azure_client_id: Some("test-client-id".to_string()),
        azure_client_secret: Some(secret_string("test-client-secret".to_string())),
        azure_dcr_immutable_id: Some("dcr-test123".to_string()),
        azure_dce_endpoint: Some("https://test-dce.monitor.azure.com".to_string()),
        azure_stream_name: Some("Custom-QuoteSplitter_CL".to_string()),
        ..LoggingConfig::default()
    }
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.azure_enabled);
}

#[test]
fn test_logging_directory_not_created_by_config() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        ..LoggingConfig::default()
    };

    // The directory is only created when logging is initialized
    assert!(config.local_enabled);
    assert!(!log_path.exists());
}

#[test]
fn test_azure_logger_disabled() {
    let result = AzureLogger::new(&LoggingConfig::default());
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Azure logging is not enabled"));
    }
}

#[test]
fn test_azure_logger_enabled() {
    let logger = AzureLogger::new(&azure_config()).unwrap();
    assert_eq!(
        logger.ingestion_url(),
        "https://test-dce.monitor.azure.com/dataCollectionRules/dcr-test123/streams/Custom-QuoteSplitter_CL?api-version=2023-01-01"
    );
}

// Note: Actual API calls to Azure Log Analytics are not tested here
// as they require real Azure credentials and infrastructure.

#[tokio::test]
async fn test_closed_azure_sink_finishes_without_delivery() {
    let logger = AzureLogger::new(&azure_config()).unwrap();
    let (sink, handle) = AzureEventSink::spawn(logger);

    sink.close();
    // Emitting after close is a no-op
    sink.emit(&Event::info(names::START, "Starting quote split run"));
    handle.finish().await;
}

#[test]
fn test_fanout_reaches_every_sink() {
    let first = Arc::new(MemorySink::new());
    let second = Arc::new(MemorySink::new());
    let fanout = FanoutSink::new()
        .with_sink(Arc::new(TracingSink))
        .with_sink(first.clone())
        .with_sink(second.clone());
    assert_eq!(fanout.len(), 3);

    fanout.emit(
        &Event::error(names::GENERAL_ERROR, "Failed to execute function")
            .with_unit("list_objects")
            .with_property("error_msg", "boom"),
    );

    for sink in [first, second] {
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Error);
        assert_eq!(events[0].property_str("error_msg"), Some("boom"));
    }
}
