//! Request-level failures.
//!
//! Each variant maps to a stable HTTP status so callers can pick the right
//! affordance: a validation message, a sign-in prompt, or a retry button.

use thiserror::Error;

/// Errors surfaced by a parse request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Extraction provider timed out after {elapsed_seconds}s")]
    ProviderTimeout { elapsed_seconds: u64 },

    #[error("{}", provider_error_message(.status, .message))]
    ProviderError {
        /// HTTP status from the provider; absent for transport failures
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

fn provider_error_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Extraction provider error ({}): {}", code, message),
        None => format!("Extraction provider unreachable: {}", message),
    }
}

impl IngestError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::ProviderError { .. } => 502,
            Self::ProviderTimeout { .. } => 504,
            Self::Unexpected(_) => 500,
        }
    }

    /// Whether a caller should offer a retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderTimeout { .. } | Self::ProviderError { .. })
    }

    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ProviderError {
            status,
            message: message.into(),
        }
    }
}
