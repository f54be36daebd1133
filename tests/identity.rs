//! Identity Verifier Integration Tests
//!
//! Runs HttpIdentityVerifier against a local fake identity service, then
//! checks that an identity service outage surfaces as a 500 from the router
//! without reaching the extraction provider.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use common::StubProvider;
use quicknote::adapters::HttpIdentityVerifier;
use quicknote::core::{IngestError, NoteIngestService};
use quicknote::server::{router, AppState};
use quicknote::{IdentityVerifier, UserIdentity};
use serde_json::{json, Value};
use tower::ServiceExt;

const GOOD_TOKEN: &str = "good-token";
const API_KEY: &str = "anon-key";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Start a fake identity service on an ephemeral port, returning its base URL
async fn spawn_identity_service() -> String {
    let app = Router::new()
        .route(
            "/user",
            get(|headers: HeaderMap| async move {
                if header_value(&headers, "authorization") != format!("Bearer {}", GOOD_TOKEN) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"msg": "bad jwt"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"id": "user-1", "email": "owner@example.com", "role": "authenticated"})),
                )
            }),
        )
        .route(
            "/keyed",
            get(|headers: HeaderMap| async move {
                if header_value(&headers, "apikey") != API_KEY {
                    return (StatusCode::FORBIDDEN, Json(json!({"msg": "no api key"})));
                }
                (StatusCode::OK, Json(json!({"id": "user-2"})))
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database is down") }),
        )
        .route("/garbage", get(|| async { "<html>not json</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_valid_token_returns_identity() {
    let base = spawn_identity_service().await;
    let verifier = HttpIdentityVerifier::new(format!("{}/user", base), None);

    let identity = verifier.verify(GOOD_TOKEN).await.unwrap();

    assert_eq!(
        identity,
        UserIdentity {
            id: "user-1".to_string(),
            email: Some("owner@example.com".to_string()),
        }
    );
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let base = spawn_identity_service().await;
    let verifier = HttpIdentityVerifier::new(format!("{}/user", base), None);

    let err = verifier.verify("expired-token").await.unwrap_err();

    assert!(matches!(err, IngestError::Unauthorized(_)));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_api_key_header_sent() {
    let base = spawn_identity_service().await;

    let keyed = HttpIdentityVerifier::new(format!("{}/keyed", base), Some(API_KEY.to_string()));
    let identity = keyed.verify(GOOD_TOKEN).await.unwrap();
    assert_eq!(identity.id, "user-2");
    assert!(identity.email.is_none());

    // Without the key the service answers 403, which reads as a bad credential
    let unkeyed = HttpIdentityVerifier::new(format!("{}/keyed", base), None);
    let err = unkeyed.verify(GOOD_TOKEN).await.unwrap_err();
    assert!(matches!(err, IngestError::Unauthorized(_)));
}

#[tokio::test]
async fn test_service_error_is_unexpected() {
    let base = spawn_identity_service().await;
    let verifier = HttpIdentityVerifier::new(format!("{}/broken", base), None);

    let err = verifier.verify(GOOD_TOKEN).await.unwrap_err();

    match &err {
        IngestError::Unexpected(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("database is down"));
        }
        other => panic!("Expected Unexpected, got {:?}", other),
    }
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_non_json_identity_is_unexpected() {
    let base = spawn_identity_service().await;
    let verifier = HttpIdentityVerifier::new(format!("{}/garbage", base), None);

    let err = verifier.verify(GOOD_TOKEN).await.unwrap_err();

    assert!(matches!(err, IngestError::Unexpected(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_unexpected() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let verifier = HttpIdentityVerifier::new(format!("http://{}/user", addr), None);
    let err = verifier.verify(GOOD_TOKEN).await.unwrap_err();

    match err {
        IngestError::Unexpected(message) => assert!(message.contains("unreachable")),
        other => panic!("Expected Unexpected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_identity_outage_is_500_without_provider_call() {
    let base = spawn_identity_service().await;
    let provider = Arc::new(StubProvider::responding(json!([{"amount": 30000}])));
    let verifier = Arc::new(HttpIdentityVerifier::new(format!("{}/broken", base), None));
    let app = router(
        AppState::new(NoteIngestService::new(provider.clone()), verifier),
        &[],
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/parse-note")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", GOOD_TOKEN))
        .body(Body::from(json!({"text": "cafe 30k"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Unexpected error"));
    assert!(body.get("transactions").is_none());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_verified_identity_reaches_provider() {
    let base = spawn_identity_service().await;
    let provider = Arc::new(StubProvider::responding(json!([{"amount": 30000}])));
    let verifier = Arc::new(HttpIdentityVerifier::new(format!("{}/user", base), None));
    let app = router(
        AppState::new(NoteIngestService::new(provider.clone()), verifier),
        &[],
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/parse-note")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", GOOD_TOKEN))
        .body(Body::from(json!({"text": "cafe 30k"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}
