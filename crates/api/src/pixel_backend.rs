//! Construction of the configured [`PixelStore`].

use std::sync::Arc;

use mailsbe_core::store::PixelStore;
use mailsbe_db::{DbPool, PgPixelStore};
use mailsbe_remote::PostgrestPixelStore;

use crate::config::PixelBackend;

/// Build the store the pixel endpoint records opens through.
///
/// The Postgres backend shares the dashboard's pool; the PostgREST backend
/// gets its own HTTP client.
pub fn build_pixel_store(
    backend: &PixelBackend,
    pool: &DbPool,
) -> Result<Arc<dyn PixelStore>, reqwest::Error> {
    let store: Arc<dyn PixelStore> = match backend {
        PixelBackend::Postgres => Arc::new(PgPixelStore::new(pool.clone())),
        PixelBackend::Postgrest(remote) => {
            tracing::info!(base_url = %remote.base_url, table = %remote.table, "Using PostgREST pixel backend");
            Arc::new(PostgrestPixelStore::new(remote.clone())?)
        }
    };
    Ok(store)
}
