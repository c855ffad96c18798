use axum::routing::get;
use axum::Router;

use crate::handlers::emails;
use crate::state::AppState;

/// Tracked email routes, mounted at `/emails`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(emails::list).post(emails::create))
        .route("/{id}", get(emails::get).delete(emails::delete))
}
