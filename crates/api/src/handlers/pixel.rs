//! Public tracking pixel.
//!
//! Every request gets the same 1x1 GIF with a 200, whatever the token and
//! whatever the store does. The only visible difference between a first
//! open and anything else is the row in the database.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA,
};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use mailsbe_core::open_tracking::{record_open, OpenOutcome};
use mailsbe_core::pixel;
use mailsbe_events::bus::EMAIL_SEEN;
use mailsbe_events::TrackingEvent;
use serde::Deserialize;

use crate::routes;
use crate::state::AppState;

/// Query string of a pixel request.
#[derive(Debug, Deserialize)]
pub struct PixelQuery {
    /// The tracking token.
    pub text: Option<String>,
}

/// Any method on `/update`, and unmatched paths outside the API.
///
/// `OPTIONS` answers the CORS preflight. Everything else records the open
/// (when there is a token) and serves the pixel. An unparsable query string
/// counts as no token.
pub async fn serve(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<PixelQuery>, QueryRejection>,
) -> Response {
    let origin = state.config.pixel.cors_origin.clone();
    if method == Method::OPTIONS {
        return preflight(origin);
    }

    let token = query.ok().and_then(|Query(q)| q.text);
    let outcome = record_open(
        state.pixel_store.as_ref(),
        token.as_deref(),
        state.config.pixel.backend_timeout,
    )
    .await;

    if let OpenOutcome::MarkedSeen(record) = outcome {
        let payload = serde_json::to_value(&record).unwrap_or_default();
        state
            .event_bus
            .publish(TrackingEvent::new(EMAIL_SEEN, record.owner_id, record.id).with_payload(payload));
    }

    pixel_response(origin)
}

/// Root fallback.
///
/// A path under the API prefix that no API route matched (`/api/v1/` with a
/// trailing slash, say) gets the JSON 404. Anything else is a pixel fetch
/// with a mangled URL.
pub async fn fallback(
    state: State<AppState>,
    method: Method,
    uri: Uri,
    query: Result<Query<PixelQuery>, QueryRejection>,
) -> Response {
    if routes::is_api_path(uri.path()) {
        return routes::api_not_found().await.into_response();
    }
    serve(state, method, query).await
}

/// The GIF with no-cache headers.
fn pixel_response(origin: HeaderValue) -> Response {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(pixel::CONTENT_TYPE)),
            (CACHE_CONTROL, HeaderValue::from_static(pixel::CACHE_CONTROL)),
            (PRAGMA, HeaderValue::from_static("no-cache")),
            (EXPIRES, HeaderValue::from_static("0")),
            (ACCESS_CONTROL_ALLOW_ORIGIN, origin),
        ],
        Bytes::from_static(&pixel::TRANSPARENT_GIF),
    )
        .into_response()
}

/// CORS preflight answer: 200 with an empty body.
fn preflight(origin: HeaderValue) -> Response {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(pixel::ALLOWED_METHODS),
            ),
            (
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(pixel::ALLOWED_HEADERS),
            ),
        ],
    )
        .into_response()
}
