//! PostgREST-backed [`PixelStore`].
//!
//! Talks to `{base_url}/rest/v1/{table}` using PostgREST filter syntax. The
//! first-open write is a single conditional `PATCH` filtered on
//! `seen=is.false` with `Prefer: return=representation`: the backend returns
//! the updated rows, so a non-empty array means this call flipped the record.

use std::time::Duration;

use async_trait::async_trait;
use mailsbe_core::store::{PixelStore, SeenRecord, StoreError};
use mailsbe_core::types::{DbId, Timestamp, UserId};
use serde::Deserialize;

use crate::credential::ServiceCredential;

/// Default column holding the tracking token.
pub const DEFAULT_TOKEN_COLUMN: &str = "tracking_token";

/// Default column holding the owning user's id.
pub const DEFAULT_OWNER_COLUMN: &str = "owner_id";

/// Header asking PostgREST to return the affected rows.
const PREFER_REPRESENTATION: &str = "return=representation";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for a PostgREST backend.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Table holding tracked emails.
    pub table: String,
    /// Column matched against the tracking token.
    pub token_column: String,
    /// Column holding the owning user's id.
    pub owner_column: String,
    /// Service credential sent as both `apikey` and bearer token.
    pub credential: ServiceCredential,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// A row as returned by the backend for the store's `select`, which aliases
/// the owner column to `owner_id`.
#[derive(Debug, Deserialize)]
struct SeenRow {
    id: DbId,
    owner_id: UserId,
    seen: bool,
    seen_at: Option<Timestamp>,
}

impl From<SeenRow> for SeenRecord {
    fn from(row: SeenRow) -> Self {
        SeenRecord {
            id: row.id,
            owner_id: row.owner_id,
            seen: row.seen,
            seen_at: row.seen_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Pixel store for a remote PostgREST-compatible data API.
pub struct PostgrestPixelStore {
    client: reqwest::Client,
    endpoint: String,
    token_column: String,
    select: String,
    credential: ServiceCredential,
    timeout: Duration,
}

impl PostgrestPixelStore {
    /// Build a store with a dedicated HTTP client.
    pub fn new(config: PostgrestConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );
        let select = format!("id,owner_id:{},seen,seen_at", config.owner_column);
        Ok(Self {
            client,
            endpoint,
            token_column: config.token_column,
            select,
            credential: config.credential,
            timeout: config.timeout,
        })
    }

    /// Attach the service credential headers to a request.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.credential.expose())
            .bearer_auth(self.credential.expose())
    }

    /// Send a request and decode the returned row array.
    async fn fetch_rows(&self, request: reqwest::RequestBuilder) -> Result<Vec<SeenRow>, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), endpoint = %self.endpoint, "PostgREST request rejected");
            return Err(StoreError::UnexpectedStatus(status.as_u16()));
        }

        response
            .json::<Vec<SeenRow>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn request_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl PixelStore for PostgrestPixelStore {
    fn backend_name(&self) -> &'static str {
        "postgrest"
    }

    async fn mark_seen(
        &self,
        token: &str,
        at: Timestamp,
    ) -> Result<Option<SeenRecord>, StoreError> {
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&[
                (self.token_column.as_str(), format!("eq.{token}")),
                ("seen", "is.false".to_string()),
                ("select", self.select.clone()),
            ])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&serde_json::json!({ "seen": true, "seen_at": at }));

        let rows = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next().map(SeenRecord::from))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SeenRecord>, StoreError> {
        let request = self.client.get(&self.endpoint).query(&[
            (self.token_column.as_str(), format!("eq.{token}")),
            ("select", self.select.clone()),
            ("limit", "1".to_string()),
        ]);

        let rows = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next().map(SeenRecord::from))
    }
}
