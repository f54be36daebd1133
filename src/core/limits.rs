//! Limits applied to every parse request.
//!
//! Bounds the note size and how long the extraction provider may take.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::IngestError;

/// Limits for a parse request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestLimits {
    /// Maximum note size in bytes (default: 10 000)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Provider call timeout in seconds (default: 45)
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_seconds: u64,
}

fn default_max_input_bytes() -> usize {
    10_000
}
fn default_provider_timeout() -> u64 {
    45
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            provider_timeout_seconds: default_provider_timeout(),
        }
    }
}

impl IngestLimits {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// Reject blank or oversized notes
    pub fn validate_input(&self, raw_text: &str) -> Result<(), IngestError> {
        if raw_text.trim().is_empty() {
            return Err(IngestError::InvalidInput("text must not be empty".to_string()));
        }

        let size = raw_text.len();
        if size > self.max_input_bytes {
            return Err(IngestError::InvalidInput(format!(
                "text is {} bytes, limit is {}",
                size, self.max_input_bytes
            )));
        }

        Ok(())
    }
}
