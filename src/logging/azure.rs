//! Azure Log Analytics integration
//!
//! Run events are delivered to a Log Analytics workspace through the Logs
//! Ingestion API, authenticating with an Azure AD client secret credential.
//! Delivery happens on a background task fed by an unbounded channel, so
//! emitting an event never waits on the network.
//!
//! # Example
//!
//! ```no_run
//! use quote_splitter::logging::azure::{AzureEventSink, AzureLogger};
//! use quote_splitter::config::LoggingConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoggingConfig::default();
//! if config.azure_enabled {
//!     let logger = AzureLogger::new(&config)?;
//!     let (sink, handle) = AzureEventSink::spawn(logger);
//!     // ... emit events through `sink` ...
//!     sink.close();
//!     handle.finish().await;
//! }
//! # Ok(())
//! # }
//! ```

use super::events::{Event, EventSink};
use crate::config::LoggingConfig;
use crate::domain::errors::SplitterError;
use crate::domain::Result;
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const MONITOR_SCOPE: &str = "https://monitor.azure.com/.default";

/// Largest number of events posted in one request
const MAX_BATCH: usize = 50;

/// How long [`AzureSinkHandle::finish`] waits for pending events
const FLUSH_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the Logs Ingestion API
pub struct AzureLogger {
    /// Azure AD credential for authentication
    credential: Arc<ClientSecretCredential>,
    /// Data Collection Rule (DCR) immutable ID
    dcr_immutable_id: String,
    /// Data Collection Endpoint (DCE) URL
    dce_endpoint: String,
    /// Stream name for custom logs
    stream_name: String,
    /// HTTP client for API calls
    http_client: reqwest::Client,
}

impl AzureLogger {
    /// Create a new Azure logger from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if Azure logging is not enabled or required settings are missing
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        if !config.azure_enabled {
            return Err(SplitterError::Configuration(
                "Azure logging is not enabled".to_string(),
            ));
        }

        let tenant_id = required(&config.azure_tenant_id, "azure_tenant_id")?;
        let client_id = required(&config.azure_client_id, "azure_client_id")?;
        let dcr_immutable_id = required(&config.azure_dcr_immutable_id, "azure_dcr_immutable_id")?;
        let dce_endpoint = required(&config.azure_dce_endpoint, "azure_dce_endpoint")?;
        let stream_name = required(&config.azure_stream_name, "azure_stream_name")?;
        let client_secret = config.azure_client_secret.as_ref().ok_or_else(|| {
            SplitterError::Configuration(
                "azure_client_secret is required when Azure logging is enabled".to_string(),
            )
        })?;

        let secret =
            azure_core::credentials::Secret::new(client_secret.expose_secret().as_ref().to_string());

        let credential = ClientSecretCredential::new(&tenant_id, client_id, secret, None)
            .map_err(|e| {
                SplitterError::AzureLogging(format!("Failed to create Azure AD credential: {}", e))
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                SplitterError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        debug!(
            dcr_id = %dcr_immutable_id,
            stream = %stream_name,
            "Azure Log Analytics logger initialized"
        );

        Ok(Self {
            credential,
            dcr_immutable_id,
            dce_endpoint,
            stream_name,
            http_client,
        })
    }

    /// Logs Ingestion API URL for the configured rule and stream
    pub fn ingestion_url(&self) -> String {
        format!(
            "{}/dataCollectionRules/{}/streams/{}?api-version=2023-01-01",
            self.dce_endpoint.trim_end_matches('/'),
            self.dcr_immutable_id,
            self.stream_name
        )
    }

    async fn get_access_token(&self) -> Result<String> {
        let token = TokenCredential::get_token(&*self.credential, &[MONITOR_SCOPE], None)
            .await
            .map_err(|e| {
                SplitterError::AzureLogging(format!("Failed to acquire Azure AD token: {}", e))
            })?;

        Ok(token.token.secret().to_string())
    }

    /// Posts a batch of events
    ///
    /// # Errors
    ///
    /// Returns an error if token acquisition or the API call fails
    pub async fn send_events(&self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let token = self.get_access_token().await?;
        let records = Value::Array(events.iter().map(to_record).collect());

        let response = self
            .http_client
            .post(self.ingestion_url())
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&records)
            .send()
            .await
            .map_err(|e| {
                SplitterError::AzureLogging(format!("Failed to send logs to Azure: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                status = %status,
                record_count = events.len(),
                "Sent events to Azure Log Analytics"
            );
            Ok(())
        } else {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(SplitterError::AzureLogging(format!(
                "Azure Log Analytics API returned status {}: {}",
                status, error_body
            )))
        }
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value.clone().ok_or_else(|| {
        SplitterError::Configuration(format!(
            "{name} is required when Azure logging is enabled"
        ))
    })
}

/// Row shape of the custom log table
fn to_record(event: &Event) -> Value {
    json!({
        "TimeGenerated": event.timestamp.to_rfc3339(),
        "RunId": event.run_id.map(|id| id.to_string()).unwrap_or_default(),
        "EventName": event.name,
        "Severity": event.severity.as_str(),
        "Message": event.message,
        "Unit": event.unit.clone().unwrap_or_default(),
        "Properties": Value::Object(event.properties.clone()),
    })
}

/// Fire-and-forget sink delivering events to Azure Log Analytics
pub struct AzureEventSink {
    tx: Mutex<Option<mpsc::UnboundedSender<Event>>>,
}

/// Owns the background delivery task
pub struct AzureSinkHandle {
    join: JoinHandle<()>,
}

impl AzureEventSink {
    /// Starts the delivery task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(logger: AzureLogger) -> (Self, AzureSinkHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(deliver(logger, rx));
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            AzureSinkHandle { join },
        )
    }

    /// Stops accepting events; pending ones are still delivered
    pub fn close(&self) {
        if let Ok(mut tx) = self.tx.lock() {
            tx.take();
        }
    }
}

impl EventSink for AzureEventSink {
    fn emit(&self, event: &Event) {
        if let Ok(tx) = self.tx.lock() {
            if let Some(tx) = tx.as_ref() {
                // A closed channel means delivery has stopped; nothing else to do
                let _ = tx.send(event.clone());
            }
        }
    }
}

impl AzureSinkHandle {
    /// Waits for pending events to be delivered
    ///
    /// The sink must be closed first, otherwise this waits for the timeout.
    pub async fn finish(self) {
        if tokio::time::timeout(FLUSH_TIMEOUT, self.join).await.is_err() {
            warn!("Timed out flushing events to Azure Log Analytics");
        }
    }
}

async fn deliver(logger: AzureLogger, mut rx: mpsc::UnboundedReceiver<Event>) {
    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while batch.len() < MAX_BATCH {
            match rx.try_recv() {
                Ok(event) => batch.push(event),
                Err(_) => break,
            }
        }

        if let Err(e) = logger.send_events(&batch).await {
            warn!(error = %e, dropped = batch.len(), "Failed to deliver events to Azure");
        }
    }
}
