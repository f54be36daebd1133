//! Configuration for quicknote.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (QUICKNOTE_*)
//! 2. Config file (.quicknote/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .quicknote/config.yaml
//! - Falls back to ~/.quicknote/config.yaml

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::{HttpIdentityVerifier, IdentityVerifier, StaticTokenVerifier, WorkerProvider};
use crate::core::{IngestLimits, NoteIngestService};
use crate::domain::DEFAULT_CATEGORY_LABEL;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_PROVIDER_URL: &str = "QUICKNOTE_PROVIDER_URL";
pub const ENV_PROVIDER_TOKEN: &str = "QUICKNOTE_PROVIDER_TOKEN";
pub const ENV_PROVIDER_TIMEOUT: &str = "QUICKNOTE_PROVIDER_TIMEOUT";
pub const ENV_AUTH_URL: &str = "QUICKNOTE_AUTH_URL";
pub const ENV_AUTH_API_KEY: &str = "QUICKNOTE_AUTH_API_KEY";
pub const ENV_BIND: &str = "QUICKNOTE_BIND";

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: Option<IngestLimits>,
    /// Label for candidates without a category
    pub default_category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Identity service endpoint that resolves a bearer token to a user
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Tokens accepted without an identity service
    #[serde(default)]
    pub static_tokens: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider_url: Option<String>,
    pub provider_token: Option<String>,
    pub auth_url: Option<String>,
    pub auth_api_key: Option<String>,
    pub static_tokens: Vec<String>,
    pub bind: String,
    pub cors_origins: Vec<String>,
    pub limits: IngestLimits,
    pub default_category: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            provider_token: None,
            auth_url: None,
            auth_api_key: None,
            static_tokens: Vec::new(),
            bind: DEFAULT_BIND.to_string(),
            cors_origins: Vec::new(),
            limits: IngestLimits::default(),
            default_category: DEFAULT_CATEGORY_LABEL.to_string(),
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Build the HTTP extraction provider
    pub fn build_provider(&self) -> Result<WorkerProvider> {
        let url = self
            .provider_url
            .as_deref()
            .with_context(|| format!("No extraction provider configured (set {})", ENV_PROVIDER_URL))?;
        Ok(WorkerProvider::new(url, self.provider_token.clone()))
    }

    /// Build the ingestion service over the configured provider
    pub fn build_service(&self) -> Result<NoteIngestService> {
        let provider = self.build_provider()?;
        Ok(NoteIngestService::new(Arc::new(provider))
            .with_limits(self.limits.clone())
            .with_default_category(self.default_category.clone()))
    }

    /// Identity service if configured, otherwise the static token list
    pub fn build_verifier(&self) -> Result<Arc<dyn IdentityVerifier>> {
        if let Some(url) = &self.auth_url {
            return Ok(Arc::new(HttpIdentityVerifier::new(
                url.clone(),
                self.auth_api_key.clone(),
            )));
        }

        let verifier = StaticTokenVerifier::new(self.static_tokens.iter().cloned());
        if verifier.is_empty() {
            anyhow::bail!(
                "No authentication configured (set {} or auth.static_tokens)",
                ENV_AUTH_URL
            );
        }
        Ok(Arc::new(verifier))
    }

    /// Human-readable summary with secrets masked
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!(
                "config file:       {}",
                self.config_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            ),
            format!("provider url:      {}", self.provider_url.as_deref().unwrap_or("(unset)")),
            format!("provider token:    {}", mask(self.provider_token.as_deref())),
            format!("auth url:          {}", self.auth_url.as_deref().unwrap_or("(unset)")),
            format!("auth api key:      {}", mask(self.auth_api_key.as_deref())),
            format!("static tokens:     {}", self.static_tokens.len()),
            format!("bind:              {}", self.bind),
        ];

        let origins = if self.cors_origins.is_empty() {
            "* (any)".to_string()
        } else {
            self.cors_origins.join(", ")
        };
        lines.push(format!("cors origins:      {}", origins));
        lines.push(format!("provider timeout:  {}s", self.limits.provider_timeout_seconds));
        lines.push(format!("max input bytes:   {}", self.limits.max_input_bytes));
        lines.push(format!("default category:  {}", self.default_category));
        lines.join("\n")
    }
}

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "****",
        _ => "(unset)",
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".quicknote").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".quicknote").join("config.yaml"))
        .filter(|p| p.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge a config file with environment overrides
fn resolve<F>(file: ConfigFile, config_file: Option<PathBuf>, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ResolvedConfig::default();

    let mut limits = file.limits.unwrap_or_default();
    if let Some(raw) = env(ENV_PROVIDER_TIMEOUT) {
        limits.provider_timeout_seconds = raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", ENV_PROVIDER_TIMEOUT, raw))?;
    }

    Ok(ResolvedConfig {
        provider_url: env(ENV_PROVIDER_URL).or(file.provider.url),
        provider_token: env(ENV_PROVIDER_TOKEN).or(file.provider.token),
        auth_url: env(ENV_AUTH_URL).or(file.auth.url),
        auth_api_key: env(ENV_AUTH_API_KEY).or(file.auth.api_key),
        static_tokens: file.auth.static_tokens,
        bind: env(ENV_BIND)
            .or(file.server.bind)
            .unwrap_or(defaults.bind),
        cors_origins: file.server.cors_origins,
        limits,
        default_category: file
            .default_category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(defaults.default_category),
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    resolve(file, config_file, |key| {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
