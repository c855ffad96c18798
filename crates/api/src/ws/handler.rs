use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use mailsbe_core::error::CoreError;
use mailsbe_core::types::UserId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters for the upgrade request.
///
/// Browsers cannot set headers on a WebSocket handshake, so the access token
/// travels in the query string.
#[derive(Debug, Deserialize)]
pub struct WsAuthParams {
    pub token: Option<String>,
}

/// GET /api/v1/ws?token=<jwt> -- upgrade to a live-update socket.
///
/// The token is checked before the upgrade is looked at, so a missing or
/// invalid token always gets a 401 JSON response instead of a socket.
pub async fn ws_handler(
    State(state): State<AppState>,
    query: Result<Query<WsAuthParams>, QueryRejection>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let token = query
        .ok()
        .and_then(|Query(params)| params.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing token".into())))?;
    let user = AuthUser::from_token(&token, &state.config.jwt)?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user.user_id))
        .into_response())
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection under `user_id`, forwards queued messages from a
/// spawned sender task, drains inbound frames until close, then cleans up.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: UserId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    // The dashboard never sends anything meaningful; drain until close.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let connected_for = ws_manager
        .remove(&conn_id)
        .await
        .map(|conn| (chrono::Utc::now() - conn.connected_at).num_seconds());
    send_task.abort();
    tracing::info!(conn_id = %conn_id, connected_secs = ?connected_for, "WebSocket disconnected");
}
