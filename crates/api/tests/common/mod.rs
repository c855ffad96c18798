//! Shared helpers for the API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use mailsbe_api::auth::jwt::{generate_access_token, JwtConfig};
use mailsbe_api::config::{PixelBackend, PixelConfig, ServerConfig, DEFAULT_PIXEL_BASE_URL};
use mailsbe_api::router::build_app_router;
use mailsbe_api::state::AppState;
use mailsbe_api::ws::WsManager;
use mailsbe_core::store::{PixelStore, SeenRecord, StoreError};
use mailsbe_core::types::{Timestamp, UserId};
use mailsbe_db::PgPixelStore;
use mailsbe_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Dashboard origin allowed by the test CORS layer.
pub const DASHBOARD_ORIGIN: &str = "http://localhost:5173";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A `ServerConfig` with safe defaults and the Postgres pixel backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![DASHBOARD_ORIGIN.to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: None,
        },
        pixel: PixelConfig {
            base_url: DEFAULT_PIXEL_BASE_URL.to_string(),
            cors_origin: HeaderValue::from_static("*"),
            backend_timeout: Duration::from_secs(3),
            backend: PixelBackend::Postgres,
        },
    }
}

/// State backed by the test database for both the dashboard and the pixel.
pub fn test_state(pool: PgPool) -> AppState {
    let store = Arc::new(PgPixelStore::new(pool.clone()));
    test_state_with_store(pool, store, test_config())
}

/// State with a custom pixel store and config.
pub fn test_state_with_store(
    pool: PgPool,
    pixel_store: Arc<dyn PixelStore>,
    config: ServerConfig,
) -> AppState {
    AppState {
        pool,
        config: Arc::new(config),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        pixel_store,
    }
}

/// The production router over `state`.
pub fn app(state: &AppState) -> Router {
    build_app_router(state.clone(), &state.config)
}

/// The production router over a fresh Postgres-backed state.
pub fn build_test_app(pool: PgPool) -> Router {
    app(&test_state(pool))
}

/// A bearer token for `user` signed with the test secret.
pub fn token_for(user: UserId) -> String {
    generate_access_token(user, chrono::Duration::minutes(15), &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn get_as(app: Router, uri: &str, user: UserId) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    user: UserId,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_as(app: Router, uri: &str, user: UserId) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

/// Create a tracked email through the API, returning the `data` object.
pub async fn create_email(
    app: Router,
    user: UserId,
    description: &str,
) -> serde_json::Value {
    let response = post_json_as(
        app,
        "/api/v1/emails",
        user,
        serde_json::json!({
            "recipient_address": "reader@example.com",
            "description": description,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Stores that misbehave
// ---------------------------------------------------------------------------

/// Fails every call.
pub struct FailingStore;

#[async_trait]
impl PixelStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn mark_seen(&self, _: &str, _: Timestamp) -> Result<Option<SeenRecord>, StoreError> {
        Err(StoreError::Http("connection refused".into()))
    }

    async fn find_by_token(&self, _: &str) -> Result<Option<SeenRecord>, StoreError> {
        Err(StoreError::Http("connection refused".into()))
    }
}

/// Never answers.
pub struct StalledStore;

#[async_trait]
impl PixelStore for StalledStore {
    fn backend_name(&self) -> &'static str {
        "stalled"
    }

    async fn mark_seen(&self, _: &str, _: Timestamp) -> Result<Option<SeenRecord>, StoreError> {
        std::future::pending().await
    }

    async fn find_by_token(&self, _: &str) -> Result<Option<SeenRecord>, StoreError> {
        std::future::pending().await
    }
}
