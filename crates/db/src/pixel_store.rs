//! PostgreSQL-backed [`PixelStore`].

use async_trait::async_trait;
use mailsbe_core::store::{PixelStore, SeenRecord, StoreError};
use mailsbe_core::types::Timestamp;

use crate::repositories::TrackedEmailRepo;
use crate::DbPool;

/// Pixel store reading and writing the service's own `tracked_emails` table.
#[derive(Clone)]
pub struct PgPixelStore {
    pool: DbPool,
}

impl PgPixelStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PixelStore for PgPixelStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn mark_seen(
        &self,
        token: &str,
        at: Timestamp,
    ) -> Result<Option<SeenRecord>, StoreError> {
        TrackedEmailRepo::mark_seen(&self.pool, token, at)
            .await
            .map(|row| row.map(SeenRecord::from))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SeenRecord>, StoreError> {
        TrackedEmailRepo::find_by_token(&self.pool, token)
            .await
            .map(|row| row.map(SeenRecord::from))
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
