//! Live updates: pixel opens reach the owner's dashboard sockets, and the
//! WebSocket endpoint refuses unauthenticated upgrades.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use common::{app, body_json, get, test_state, token_for};
use mailsbe_api::live::LiveUpdateRouter;
use mailsbe_db::repositories::TrackedEmailRepo;
use mailsbe_events::bus::EMAIL_SEEN;
use sqlx::PgPool;
use uuid::Uuid;

async fn next_frame(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("frame should arrive")
        .expect("channel open");
    match msg {
        Message::Text(t) => serde_json::from_str(t.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pixel_open_is_pushed_to_owner_socket(pool: PgPool) {
    let owner = Uuid::new_v4();
    let email = TrackedEmailRepo::create(&pool, owner, "reader@example.com", "invoice", "tok")
        .await
        .unwrap();

    let state = test_state(pool);
    let router = LiveUpdateRouter::new(Arc::clone(&state.ws_manager));
    tokio::spawn(router.run(state.event_bus.subscribe()));

    let mut owner_socket = state.ws_manager.add("owner".into(), owner).await;
    let mut stranger_socket = state.ws_manager.add("stranger".into(), Uuid::new_v4()).await;

    get(app(&state), "/update?text=tok").await;

    let frame = next_frame(&mut owner_socket).await;
    assert_eq!(frame["type"], EMAIL_SEEN);
    assert_eq!(frame["email_id"], email.id);
    assert_eq!(frame["data"]["seen"], true);
    assert!(frame["data"]["seen_at"].is_string());

    // A repeat open is not an update.
    get(app(&state), "/update?text=tok").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(owner_socket.try_recv().is_err());
    assert!(stranger_socket.try_recv().is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ws_without_token_is_401(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/ws").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ws_with_bad_token_is_401(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/ws?token=garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ws_with_valid_token_still_requires_upgrade(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let response = get(common::build_test_app(pool), &format!("/api/v1/ws?token={token}")).await;

    assert!(response.status().is_client_error());
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}
