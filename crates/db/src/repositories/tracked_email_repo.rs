//! Repository for the `tracked_emails` table.

use mailsbe_core::types::{DbId, Timestamp, UserId};
use sqlx::PgPool;

use crate::models::tracked_email::TrackedEmail;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, recipient_address, description, tracking_token, \
                       seen, seen_at, created_at";

/// Unique constraint guarding `tracking_token`.
pub const TRACKING_TOKEN_CONSTRAINT: &str = "uq_tracked_emails_tracking_token";

/// Provides CRUD operations for tracked emails.
///
/// Dashboard operations are always scoped to an owner. The token-based
/// operations serve the public pixel endpoint and are not.
pub struct TrackedEmailRepo;

impl TrackedEmailRepo {
    /// Insert a new unseen tracked email, returning the created row.
    ///
    /// `recipient_address` and `description` are expected to be validated.
    pub async fn create(
        pool: &PgPool,
        owner_id: UserId,
        recipient_address: &str,
        description: &str,
        tracking_token: &str,
    ) -> Result<TrackedEmail, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracked_emails (owner_id, recipient_address, description, tracking_token) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(owner_id)
            .bind(recipient_address)
            .bind(description)
            .bind(tracking_token)
            .fetch_one(pool)
            .await
    }

    /// Find a tracked email by ID, only if it belongs to `owner_id`.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
    ) -> Result<Option<TrackedEmail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracked_emails WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's tracked emails, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackedEmail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracked_emails \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a tracked email owned by `owner_id`.
    ///
    /// Returns the deleted row, or `None` if no owned row had that ID.
    pub async fn delete_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
    ) -> Result<Option<TrackedEmail>, sqlx::Error> {
        let query = format!(
            "DELETE FROM tracked_emails WHERE id = $1 AND owner_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tracked email by its tracking token.
    pub async fn find_by_token(
        pool: &PgPool,
        tracking_token: &str,
    ) -> Result<Option<TrackedEmail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracked_emails WHERE tracking_token = $1");
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(tracking_token)
            .fetch_optional(pool)
            .await
    }

    /// Mark the email with `tracking_token` as seen at `seen_at`, only if it
    /// is still unseen.
    ///
    /// Single conditional statement: of any number of concurrent callers,
    /// exactly one gets `Some(row)`.
    pub async fn mark_seen(
        pool: &PgPool,
        tracking_token: &str,
        seen_at: Timestamp,
    ) -> Result<Option<TrackedEmail>, sqlx::Error> {
        let query = format!(
            "UPDATE tracked_emails SET seen = true, seen_at = $2 \
             WHERE tracking_token = $1 AND seen = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackedEmail>(&query)
            .bind(tracking_token)
            .bind(seen_at)
            .fetch_optional(pool)
            .await
    }
}
