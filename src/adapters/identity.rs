//! Bearer credential verification.
//!
//! `HttpIdentityVerifier` asks an identity service who owns a token
//! (`GET <auth url>` returning `{ "id", "email" }`). `StaticTokenVerifier`
//! accepts a fixed list of tokens from configuration.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{truncate_message, IdentityVerifier, UserIdentity};
use crate::core::{fingerprint, IngestError};

/// Identity service client
pub struct HttpIdentityVerifier {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpIdentityVerifier {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<UserIdentity, IngestError> {
        let mut request = self.client.get(&self.endpoint).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IngestError::Unexpected(format!("identity service unreachable: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IngestError::Unauthorized("invalid or expired token".to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IngestError::Unexpected(format!(
                "identity service error ({}): {}",
                status,
                truncate_message(&text)
            )));
        }

        response
            .json::<UserIdentity>()
            .await
            .map_err(|e| IngestError::Unexpected(format!("invalid identity response: {}", e)))
    }
}

/// Accepts tokens listed in configuration
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: Vec<String>,
}

impl StaticTokenVerifier {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserIdentity, IngestError> {
        if self.tokens.iter().any(|t| t == token) {
            Ok(UserIdentity {
                id: format!("static:{}", fingerprint(token)),
                email: None,
            })
        } else {
            Err(IngestError::Unauthorized("unknown token".to_string()))
        }
    }
}
