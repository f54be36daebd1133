//! Shared test doubles for the extraction provider.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use quicknote::core::IngestError;
use quicknote::domain::ProviderPayload;
use quicknote::ExtractionProvider;
use serde_json::Value;

/// What the stub does when called
pub enum Behavior {
    Respond(Value),
    Fail(IngestError),
    /// Sleep, then respond (for timeout tests)
    Stall(Duration, Value),
}

/// Provider stub that records every payload it receives
pub struct StubProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Value>>,
}

impl StubProvider {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn responding(body: Value) -> Self {
        Self::new(Behavior::Respond(body))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn extract(
        &self,
        payload: &ProviderPayload<'_>,
        _timeout: Duration,
    ) -> Result<Value, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::to_value(payload).unwrap());

        match &self.behavior {
            Behavior::Respond(body) => Ok(body.clone()),
            Behavior::Fail(err) => Err(err.clone()),
            Behavior::Stall(delay, body) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
        }
    }
}
