//! Adapter interfaces for external systems.
//!
//! Two collaborators sit behind traits so the service and the HTTP layer
//! can be driven by stubs in tests:
//! - `ExtractionProvider`: the LLM worker that turns text into candidates
//! - `IdentityVerifier`: maps a bearer credential to a user

pub mod identity;
pub mod worker;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::IngestError;
use crate::domain::ProviderPayload;

// Re-export the concrete adapters
pub use identity::{HttpIdentityVerifier, StaticTokenVerifier};
pub use worker::WorkerProvider;

/// Longest provider message kept in an error
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Trait for natural-language extraction providers
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Send one payload and return the untrusted response body.
    ///
    /// Must fail with `ProviderTimeout` once `timeout` has elapsed and with
    /// `ProviderError` for non-success statuses or transport failures.
    async fn extract(
        &self,
        payload: &ProviderPayload<'_>,
        timeout: Duration,
    ) -> Result<Value, IngestError>;
}

/// The user behind a verified credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Trait for bearer-credential verification
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a bearer token, failing with `Unauthorized` if it is not valid
    async fn verify(&self, token: &str) -> Result<UserIdentity, IngestError>;
}

/// Clip a message to `MAX_ERROR_MESSAGE_CHARS` characters
pub(crate) fn truncate_message(message: &str) -> String {
    let trimmed = message.trim();
    match trimmed.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
