use axum::routing::any;
use axum::Router;

use crate::handlers::pixel;
use crate::state::AppState;

/// Public pixel route. Every method is accepted; see [`pixel::serve`].
pub fn router() -> Router<AppState> {
    Router::new().route("/update", any(pixel::serve))
}
