//! First-open recording for the pixel endpoint.
//!
//! [`record_open`] never returns an error: every failure is logged and folded
//! into an [`OpenOutcome`]. The caller serves the pixel whatever the outcome.

use std::future::Future;
use std::time::Duration;

use crate::store::{PixelStore, SeenRecord, StoreError};
use crate::tracking_token;

/// What a single pixel request did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The request carried no usable token; nothing was looked up.
    NoToken,
    /// This request flipped the record from unseen to seen.
    MarkedSeen(SeenRecord),
    /// The record had already been seen; nothing was written.
    AlreadySeen(SeenRecord),
    /// No record carries this token.
    NotFound,
    /// The store failed or timed out; the open was not recorded.
    Failed,
}

/// Record an open for the raw `text` query value.
///
/// The conditional write runs first, so concurrent first opens race inside
/// the store and exactly one of them observes [`OpenOutcome::MarkedSeen`].
/// The follow-up lookup only classifies the no-op for logging. Each store
/// call is bounded by `timeout`.
pub async fn record_open(
    store: &dyn PixelStore,
    raw_token: Option<&str>,
    timeout: Duration,
) -> OpenOutcome {
    let Some(token) = tracking_token::normalize_inbound(raw_token) else {
        tracing::debug!("Pixel request without usable tracking token");
        return OpenOutcome::NoToken;
    };
    let backend = store.backend_name();

    let now = chrono::Utc::now();
    match bounded(timeout, store.mark_seen(token, now)).await {
        Ok(Some(record)) => {
            tracing::info!(
                email_id = record.id,
                owner_id = %record.owner_id,
                backend,
                "Tracked email marked as seen"
            );
            return OpenOutcome::MarkedSeen(record);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, token, backend, "Failed to mark tracked email as seen");
            return OpenOutcome::Failed;
        }
    }

    match bounded(timeout, store.find_by_token(token)).await {
        Ok(Some(record)) if record.seen => {
            tracing::debug!(
                email_id = record.id,
                seen_at = ?record.seen_at,
                "Tracked email already seen, skipping update"
            );
            OpenOutcome::AlreadySeen(record)
        }
        Ok(Some(record)) => {
            tracing::warn!(
                email_id = record.id,
                backend,
                "Conditional update matched nothing but record is unseen"
            );
            OpenOutcome::Failed
        }
        Ok(None) => {
            tracing::debug!(token, "No tracked email for token");
            OpenOutcome::NotFound
        }
        Err(e) => {
            tracing::warn!(error = %e, token, backend, "Tracked email lookup failed");
            OpenOutcome::Failed
        }
    }
}

/// Run a store call under `timeout`, mapping expiry to [`StoreError::Timeout`].
async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(StoreError::Timeout(timeout)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::types::Timestamp;

    const TIMEOUT: Duration = Duration::from_secs(2);

    /// Store backed by a map; the conditional write happens under one lock.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<String, SeenRecord>>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        fn with_unseen(token: &str) -> Self {
            let store = Self::default();
            store.rows.lock().unwrap().insert(
                token.to_string(),
                SeenRecord {
                    id: 1,
                    owner_id: Uuid::new_v4(),
                    seen: false,
                    seen_at: None,
                },
            );
            store
        }

        fn get(&self, token: &str) -> Option<SeenRecord> {
            self.rows.lock().unwrap().get(token).cloned()
        }
    }

    #[async_trait]
    impl PixelStore for MemoryStore {
        fn backend_name(&self) -> &'static str {
            "memory"
        }

        async fn mark_seen(
            &self,
            token: &str,
            at: Timestamp,
        ) -> Result<Option<SeenRecord>, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(token) {
                Some(row) if !row.seen => {
                    row.seen = true;
                    row.seen_at = Some(at);
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(row.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn find_by_token(&self, token: &str) -> Result<Option<SeenRecord>, StoreError> {
            Ok(self.get(token))
        }
    }

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl PixelStore for BrokenStore {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn mark_seen(&self, _: &str, _: Timestamp) -> Result<Option<SeenRecord>, StoreError> {
            Err(StoreError::UnexpectedStatus(503))
        }

        async fn find_by_token(&self, _: &str) -> Result<Option<SeenRecord>, StoreError> {
            Err(StoreError::UnexpectedStatus(503))
        }
    }

    /// Store that never answers within any reasonable bound.
    struct StalledStore;

    #[async_trait]
    impl PixelStore for StalledStore {
        fn backend_name(&self) -> &'static str {
            "stalled"
        }

        async fn mark_seen(&self, _: &str, _: Timestamp) -> Result<Option<SeenRecord>, StoreError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(None)
        }

        async fn find_by_token(&self, _: &str) -> Result<Option<SeenRecord>, StoreError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn missing_token_skips_the_store() {
        let store = MemoryStore::with_unseen("tok");
        assert_eq!(record_open(&store, None, TIMEOUT).await, OpenOutcome::NoToken);
        assert_eq!(record_open(&store, Some("  "), TIMEOUT).await, OpenOutcome::NoToken);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_open_marks_seen_with_timestamp_in_window() {
        let store = MemoryStore::with_unseen("tok");
        let before = chrono::Utc::now();

        let outcome = record_open(&store, Some("tok"), TIMEOUT).await;
        let after = chrono::Utc::now();

        assert_matches!(outcome, OpenOutcome::MarkedSeen(ref r) if r.seen);
        let row = store.get("tok").unwrap();
        let seen_at = row.seen_at.expect("seen_at must be set");
        assert!(seen_at >= before && seen_at <= after);
    }

    #[tokio::test]
    async fn repeat_open_leaves_seen_at_unchanged() {
        let store = MemoryStore::with_unseen("tok");
        record_open(&store, Some("tok"), TIMEOUT).await;
        let first = store.get("tok").unwrap().seen_at;

        let outcome = record_open(&store, Some("tok"), TIMEOUT).await;

        assert_matches!(outcome, OpenOutcome::AlreadySeen(_));
        assert_eq!(store.get("tok").unwrap().seen_at, first);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let store = MemoryStore::with_unseen("tok");
        let outcome = record_open(&store, Some("does-not-exist"), TIMEOUT).await;

        assert_eq!(outcome, OpenOutcome::NotFound);
        assert!(store.get("does-not-exist").is_none());
        assert!(!store.get("tok").unwrap().seen);
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let outcome = record_open(&BrokenStore, Some("tok"), TIMEOUT).await;
        assert_eq!(outcome, OpenOutcome::Failed);
    }

    #[tokio::test]
    async fn stalled_store_times_out() {
        let started = std::time::Instant::now();
        let outcome = record_open(&StalledStore, Some("tok"), Duration::from_millis(20)).await;

        assert_eq!(outcome, OpenOutcome::Failed);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn concurrent_first_opens_flip_exactly_once() {
        let store = Arc::new(MemoryStore::with_unseen("tok"));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { record_open(store.as_ref(), Some("tok"), TIMEOUT).await })
            })
            .collect();

        let mut marked = 0;
        for handle in handles {
            match handle.await.unwrap() {
                OpenOutcome::MarkedSeen(_) => marked += 1,
                OpenOutcome::AlreadySeen(_) => {}
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(marked, 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }
}
