//! Dashboard handlers for tracked emails.
//!
//! Every operation is scoped to the authenticated user: another user's
//! record is indistinguishable from a missing one.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mailsbe_core::error::CoreError;
use mailsbe_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use mailsbe_core::recipient::{
    validate_description, validate_recipient_address, validate_signature_name,
};
use mailsbe_core::types::{DbId, UserId};
use mailsbe_core::{snippet, tracking_token};
use mailsbe_db::models::tracked_email::{CreateTrackedEmail, TrackedEmail};
use mailsbe_db::repositories::tracked_email_repo::TRACKING_TOKEN_CONSTRAINT;
use mailsbe_db::repositories::TrackedEmailRepo;
use mailsbe_db::DbPool;
use mailsbe_events::bus::{EMAIL_CREATED, EMAIL_DELETED};
use mailsbe_events::TrackingEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{CreatedTrackedEmail, DataResponse};
use crate::state::AppState;

const ENTITY: &str = "TrackedEmail";

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/emails
///
/// The caller's tracked emails, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let emails = TrackedEmailRepo::list_for_owner(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: emails }))
}

/// GET /api/v1/emails/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let email = TrackedEmailRepo::find_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: email }))
}

/// POST /api/v1/emails
///
/// Registers an outgoing email and returns its pixel URL and the snippet to
/// paste into the message body. A body that is not a valid JSON object with
/// the required fields is a 400 like any other bad input.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreateTrackedEmail>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let recipient_address = input.recipient_address.trim();
    let description = input.description.trim();
    let signature_name = input
        .signature_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    validate_recipient_address(recipient_address)?;
    validate_description(description)?;
    validate_signature_name(signature_name)?;

    let email = insert_with_fresh_token(
        &state.pool,
        user.user_id,
        recipient_address,
        description,
        tracking_token::generate,
    )
    .await?;

    let pixel_url = snippet::pixel_url(&state.config.pixel.base_url, &email.tracking_token);
    let snippet = snippet::render(&pixel_url, signature_name);

    tracing::info!(email_id = email.id, user_id = %user.user_id, "Tracked email created");
    state.event_bus.publish(
        TrackingEvent::new(EMAIL_CREATED, email.owner_id, email.id)
            .with_payload(serde_json::to_value(&email).unwrap_or_default()),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedTrackedEmail {
                email,
                pixel_url,
                snippet,
            },
        }),
    ))
}

/// DELETE /api/v1/emails/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TrackedEmailRepo::delete_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    tracing::info!(email_id = deleted.id, user_id = %user.user_id, "Tracked email deleted");
    state.event_bus.publish(
        TrackingEvent::new(EMAIL_DELETED, deleted.owner_id, deleted.id)
            .with_payload(serde_json::json!({ "id": deleted.id })),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert with a token from `next_token`, drawing a new one on a token
/// collision.
///
/// Gives up with [`CoreError::Conflict`] after
/// [`MAX_GENERATION_ATTEMPTS`](tracking_token::MAX_GENERATION_ATTEMPTS)
/// colliding tokens.
pub async fn insert_with_fresh_token(
    pool: &DbPool,
    owner_id: UserId,
    recipient_address: &str,
    description: &str,
    mut next_token: impl FnMut() -> String,
) -> AppResult<TrackedEmail> {
    for attempt in 1..=tracking_token::MAX_GENERATION_ATTEMPTS {
        let token = next_token();
        match TrackedEmailRepo::create(pool, owner_id, recipient_address, description, &token)
            .await
        {
            Ok(email) => return Ok(email),
            Err(e) if is_token_collision(&e) => {
                tracing::warn!(attempt, "Tracking token collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Core(CoreError::Conflict(
        "Could not allocate a unique tracking token".into(),
    )))
}

fn is_token_collision(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.constraint() == Some(TRACKING_TOKEN_CONSTRAINT))
}
