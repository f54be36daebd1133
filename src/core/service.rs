//! The note ingestion service.
//!
//! One call: validate the note, ask the extraction provider once, then
//! normalize whatever came back. No state survives between calls, so a
//! single instance can be shared across concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::adapters::ExtractionProvider;
use crate::domain::{ParseRequest, ParseResult, DEFAULT_CATEGORY_LABEL};

use super::error::IngestError;
use super::fingerprint::fingerprint;
use super::limits::IngestLimits;
use super::normalize::normalize_response;

/// Turns free-text notes into validated transactions
#[derive(Clone)]
pub struct NoteIngestService {
    provider: Arc<dyn ExtractionProvider>,
    limits: IngestLimits,
    default_category: String,
}

impl NoteIngestService {
    /// Create a service with default limits and category label
    pub fn new(provider: Arc<dyn ExtractionProvider>) -> Self {
        Self {
            provider,
            limits: IngestLimits::default(),
            default_category: DEFAULT_CATEGORY_LABEL.to_string(),
        }
    }

    pub fn with_limits(mut self, limits: IngestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Override the label used for candidates without a category
    pub fn with_default_category(mut self, label: impl Into<String>) -> Self {
        self.default_category = label.into();
        self
    }

    pub fn limits(&self) -> &IngestLimits {
        &self.limits
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Parse a note into accepted transactions.
    ///
    /// Request-level problems (blank text, provider timeout or failure) are
    /// returned as errors. Malformed candidates are dropped, never raised.
    #[instrument(
        skip(self, request),
        fields(note = %fingerprint(&request.raw_text), provider = %self.provider.name())
    )]
    pub async fn parse(&self, request: &ParseRequest) -> Result<ParseResult, IngestError> {
        self.limits.validate_input(&request.raw_text)?;

        let call_timeout = self.limits.provider_timeout();
        let started = Instant::now();

        // The provider is also handed the budget; this bound holds even if it ignores it
        let body = match timeout(
            call_timeout,
            self.provider.extract(&request.payload(), call_timeout),
        )
        .await
        {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!(error = %e, "Extraction provider failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout_secs = call_timeout.as_secs(), "Extraction provider timed out");
                return Err(IngestError::ProviderTimeout {
                    elapsed_seconds: call_timeout.as_secs(),
                });
            }
        };

        let normalized = normalize_response(&body, &self.default_category);
        for dropped in &normalized.dropped {
            debug!(index = dropped.index, reason = %dropped.reason, "Dropped candidate");
        }

        info!(
            candidates = normalized.candidate_count(),
            accepted = normalized.accepted.len(),
            dropped = normalized.dropped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Note parsed"
        );

        Ok(ParseResult {
            accepted: normalized.accepted,
            source_text: request.raw_text.clone(),
        })
    }
}
