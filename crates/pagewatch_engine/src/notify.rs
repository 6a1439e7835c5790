use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use watch_logging::{watch_error, watch_info};

use pagewatch_core::{
    errors_message, new_pages_message, updated_pages_message, ReportStyle, RunReport,
};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook returned http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Accepts one pre-formatted message body per call.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, body: &str) -> Result<(), NotifyError>;
}

/// POSTs each message as a JSON `{"text": ...}` payload.
pub struct WebhookNotifier {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| NotifyError::Network(err.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, body: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({ "text": body }).to_string();
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| NotifyError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

/// Sends the up-to-three bucket messages (updated, new, errors) in
/// order, skipping empty buckets. A failed send is logged and does not
/// stop the remaining sends.
pub async fn send_report(notifier: &dyn Notifier, report: &RunReport, style: &ReportStyle) {
    let bodies = [
        updated_pages_message(&report.updated, style),
        new_pages_message(&report.new_pages),
        errors_message(&report.errors),
    ];

    for body in bodies.into_iter().flatten() {
        match notifier.notify(&body).await {
            Ok(()) => watch_info!("notification sent ({} bytes)", body.len()),
            Err(err) => watch_error!("notification failed: {err}"),
        }
    }
}
