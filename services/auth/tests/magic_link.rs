//! Magic link flow against a local fake backend

use auth::{AuthError, MagicLinkService};
use axum::{Json, Router, http::StatusCode, routing::post};
use common::{ApiClient, SessionManager};
use serde_json::{Value, json};

async fn magic_link(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["email"], "user@example.com");
    Json(json!({ "ok": true, "dev_login_url": "http://localhost:3000/auth/verify?token=dev" }))
}

async fn verify(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["token"] == "good-token" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-123",
                "user": { "id": "user-1", "email": "user@example.com" }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "code": "invalid_token", "message": "Link expired" } })),
        )
    }
}

async fn service() -> MagicLinkService {
    let app = Router::new().nest(
        "/api/v1",
        Router::new()
            .route("/auth/magic-link", post(magic_link))
            .route("/auth/verify", post(verify)),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::with_api_url(
        format!("http://{}/api/v1", addr),
        "en",
        SessionManager::in_memory(),
    );
    MagicLinkService::new(client)
}

#[tokio::test]
async fn request_returns_dev_login_link() {
    let service = service().await;

    let response = service
        .request_magic_link("  user@example.com ")
        .await
        .unwrap();

    assert_eq!(response.ok, Some(true));
    assert_eq!(
        response.dev_login_url.as_deref(),
        Some("http://localhost:3000/auth/verify?token=dev")
    );
}

#[tokio::test]
async fn invalid_email_is_rejected_locally() {
    let service = service().await;

    let err = service.request_magic_link("not-an-email").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));
}

#[tokio::test]
async fn verification_persists_session_and_sign_out_clears_it() {
    let service = service().await;
    assert!(!service.is_authenticated());

    let user = service.verify_magic_link("good-token").await.unwrap();
    assert_eq!(user.id, "user-1");
    assert!(service.is_authenticated());
    assert_eq!(service.current_user_id().unwrap(), Some("user-1".to_string()));

    service.sign_out().unwrap();
    assert!(!service.is_authenticated());
    assert_eq!(service.current_user_id().unwrap(), None);
}

#[tokio::test]
async fn failed_verification_surfaces_server_message() {
    let service = service().await;

    let err = service.verify_magic_link("stale-token").await.unwrap_err();
    assert_eq!(err.to_string(), "Link expired");
    assert!(!service.is_authenticated());
}

#[tokio::test]
async fn missing_token_never_reaches_backend() {
    let service = service().await;

    let err = service.verify_magic_link("").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing token. Please request a new magic link."
    );
}
