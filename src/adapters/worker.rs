//! HTTP extraction worker client.
//!
//! Endpoint: POST <provider url>, JSON body
//! Auth: optional Bearer token
//!
//! The response body is returned as raw JSON; shaping it is the service's job.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use super::{truncate_message, ExtractionProvider};
use crate::core::IngestError;
use crate::domain::ProviderPayload;

/// Extraction provider reachable over HTTP
pub struct WorkerProvider {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl WorkerProvider {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn exchange(&self, payload: &ProviderPayload<'_>) -> Result<Value, IngestError> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(IngestError::provider(
                Some(status.as_u16()),
                error_message(&body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            IngestError::provider(
                Some(status.as_u16()),
                format!("response is not valid JSON: {}", e),
            )
        })
    }
}

#[async_trait]
impl ExtractionProvider for WorkerProvider {
    fn name(&self) -> &str {
        "worker"
    }

    async fn extract(
        &self,
        payload: &ProviderPayload<'_>,
        call_timeout: Duration,
    ) -> Result<Value, IngestError> {
        debug!(endpoint = %self.endpoint, "Calling extraction worker");

        // Dropping the future on elapse aborts the in-flight request
        match timeout(call_timeout, self.exchange(payload)).await {
            Ok(result) => result,
            Err(_) => Err(IngestError::ProviderTimeout {
                elapsed_seconds: call_timeout.as_secs(),
            }),
        }
    }
}

fn transport_error(e: reqwest::Error) -> IngestError {
    IngestError::provider(e.status().map(|s| s.as_u16()), e.to_string())
}

/// Pull `error` or `message` out of a JSON error body, else use the raw text
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.to_string());
    if message.trim().is_empty() {
        return "empty response body".to_string();
    }
    truncate_message(&message)
}
