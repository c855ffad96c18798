//! Data-access seam for the pixel endpoint.
//!
//! [`PixelStore`] is the only interface the pixel endpoint talks to. Each
//! backend (the service's own PostgreSQL database, a remote PostgREST API)
//! provides an implementation; the endpoint never knows which one it has.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DbId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The subset of a tracked email the pixel endpoint needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeenRecord {
    pub id: DbId,
    pub owner_id: UserId,
    pub seen: bool,
    pub seen_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure talking to a pixel store backend.
///
/// Every variant is logged and swallowed by the pixel endpoint.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database driver reported an error.
    #[error("Database error: {0}")]
    Database(String),

    /// The HTTP request to a remote backend failed (network, DNS, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A remote backend answered with a non-2xx status code.
    #[error("Backend returned HTTP {0}")]
    UnexpectedStatus(u16),

    /// A remote backend answered with a body that could not be decoded.
    #[error("Malformed backend response: {0}")]
    Decode(String),

    /// The call did not complete within the configured bound.
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Lookup and first-open marking of tracked emails by tracking token.
#[async_trait]
pub trait PixelStore: Send + Sync {
    /// Short backend name for log fields.
    fn backend_name(&self) -> &'static str;

    /// Atomically set `seen = true, seen_at = at` on the record with
    /// `token`, but only if it is currently unseen.
    ///
    /// Returns the updated record when *this* call performed the flip and
    /// `None` when no unseen record matched (already seen, or no such token).
    async fn mark_seen(&self, token: &str, at: Timestamp)
        -> Result<Option<SeenRecord>, StoreError>;

    /// Look up the record with `token`.
    async fn find_by_token(&self, token: &str) -> Result<Option<SeenRecord>, StoreError>;
}
