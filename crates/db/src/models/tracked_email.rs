//! Tracked email entity model and DTOs.

use mailsbe_core::store::SeenRecord;
use mailsbe_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tracked_emails` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackedEmail {
    pub id: DbId,
    pub owner_id: UserId,
    pub recipient_address: String,
    pub description: String,
    pub tracking_token: String,
    pub seen: bool,
    pub seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<TrackedEmail> for SeenRecord {
    fn from(email: TrackedEmail) -> Self {
        SeenRecord {
            id: email.id,
            owner_id: email.owner_id,
            seen: email.seen,
            seen_at: email.seen_at,
        }
    }
}

/// DTO for creating a new tracked email.
///
/// The owner and tracking token are supplied by the server, never the client.
/// `signature_name` only shapes the returned snippet and is not stored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrackedEmail {
    pub recipient_address: String,
    pub description: String,
    pub signature_name: Option<String>,
}
