pub mod emails;
pub mod health;
pub mod pixel;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;
use crate::ws;

/// Mount point of [`api_routes`].
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                 WebSocket live updates (?token=<jwt>)
/// /emails             list, create
/// /emails/{id}        get, delete
/// ```
///
/// Unknown paths under `/api/v1` answer with a JSON 404; they never fall
/// through to the pixel.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/emails", emails::router())
        .fallback(api_not_found)
}

/// Whether `path` is [`API_PREFIX`] or below it.
pub fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub async fn api_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "No such API route",
            "code": "NOT_FOUND",
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_path_detection() {
        assert!(is_api_path("/api/v1"));
        assert!(is_api_path("/api/v1/"));
        assert!(is_api_path("/api/v1/emails/x/y"));
        assert!(!is_api_path("/api/v10"));
        assert!(!is_api_path("/api"));
        assert!(!is_api_path("/update"));
    }
}
