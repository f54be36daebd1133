//! HTTP endpoint for quick-note parsing.
//!
//! Routes:
//! - `POST /api/parse-note` — bearer-authenticated parse
//! - `GET  /api/health`     — liveness
//!
//! Failures are returned as `{ "error": "..." }` with the status from
//! `IngestError::status_code`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::adapters::IdentityVerifier;
use crate::config::ResolvedConfig;
use crate::core::{IngestError, NoteIngestService};
use crate::domain::{NormalizedTransaction, ParseRequest, ParseResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<NoteIngestService>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(service: NoteIngestService, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            service: Arc::new(service),
            verifier,
        }
    }
}

/// Success body for a parse
#[derive(Debug, Serialize)]
pub struct ParseNoteResponse {
    pub success: bool,
    pub transactions: Vec<NormalizedTransaction>,
    pub raw_text: String,
}

impl From<ParseResult> for ParseNoteResponse {
    fn from(result: ParseResult) -> Self {
        Self {
            success: true,
            transactions: result.accepted,
            raw_text: result.source_text,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/parse-note
///
/// The credential is checked before the body is even decoded, so an
/// unauthenticated caller never reaches the provider.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn parse_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ParseNoteResponse>, IngestError> {
    let token = bearer_token(&headers)?;
    let identity = state.verifier.verify(token).await?;

    let request: ParseRequest = serde_json::from_slice(&body)
        .map_err(|e| IngestError::InvalidInput(format!("malformed request body: {}", e)))?;

    let result = state.service.parse(&request).await?;
    info!(user = %identity.id, accepted = result.accepted.len(), "Parse request served");

    Ok(Json(result.into()))
}

/// Extract the token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Result<&str, IngestError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| IngestError::Unauthorized("missing bearer token".to_string()))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| IngestError::Unauthorized("malformed authorization header".to_string()))?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(IngestError::Unauthorized(
            "malformed authorization header".to_string(),
        ));
    }
    Ok(token)
}

// ============================================================================
// Router and server
// ============================================================================

/// CORS policy: any origin when none configured, else the allow-list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Build the application router
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/parse-note", post(parse_note))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins)),
    )
}

/// Run the server until Ctrl+C
pub async fn serve(config: &ResolvedConfig) -> Result<()> {
    let service = config.build_service()?;
    let verifier = config.build_verifier()?;
    let app = router(AppState::new(service, verifier), &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(address = %config.bind, "quicknote listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
