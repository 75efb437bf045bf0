//! Time-bounded snapshot cache for reference data.
//!
//! A [`TtlCache`] holds one snapshot and the instant it expires. Reads serve
//! the snapshot while it is fresh; the first read after expiry rebuilds it
//! from the supplied loader. The check and the rebuild are not atomic: two
//! concurrent readers of a stale cache may both rebuild, and the last write
//! wins. Both produce an equivalent snapshot, so this is harmless.
//!
//! A failed rebuild never reaches the caller. It is logged, the previous
//! snapshot is left untouched, and an empty value is returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::errors::MarketDataError;

/// Lifetime of instrument catalog snapshots.
pub const INSTRUMENT_TTL: Duration = Duration::from_secs(60 * 60);

struct Snapshot<T> {
    value: Arc<T>,
    expires_at: Instant,
}

pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot<T>>>,
}

impl<T: Default + Send + Sync> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// The snapshot, if one exists and has not expired.
    pub async fn fresh(&self) -> Option<Arc<T>> {
        let guard = self.snapshot.read().await;
        guard
            .as_ref()
            .filter(|s| Instant::now() < s.expires_at)
            .map(|s| s.value.clone())
    }

    /// When the current snapshot expires, if there is one.
    pub async fn expires_at(&self) -> Option<Instant> {
        self.snapshot.read().await.as_ref().map(|s| s.expires_at)
    }

    /// Serve the fresh snapshot or rebuild it with `load`.
    pub async fn get_or_refresh<F, Fut>(&self, load: F) -> Arc<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        if let Some(value) = self.fresh().await {
            return value;
        }

        match load().await {
            Ok(value) => {
                let value = Arc::new(value);
                *self.snapshot.write().await = Some(Snapshot {
                    value: value.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                info!("Rebuilt {} cache", self.name);
                value
            }
            Err(e) => {
                warn!("Failed to rebuild {} cache, serving empty result: {}", self.name, e);
                Arc::new(T::default())
            }
        }
    }

    /// Drop the snapshot so the next read rebuilds.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_numbers(calls: &AtomicUsize) -> Result<Vec<u32>, MarketDataError> {
        let n = calls.fetch_add(1, Ordering::SeqCst) as u32;
        Ok(vec![n])
    }

    #[tokio::test(start_paused = true)]
    async fn test_serves_snapshot_within_ttl() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_refresh(|| load_numbers(&calls)).await;
        tokio::time::advance(INSTRUMENT_TTL - Duration::from_secs(1)).await;
        let second = cache.get_or_refresh(|| load_numbers(&calls)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*first, vec![0]);
        assert_eq!(*second, vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebuilds_after_expiry() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);
        let calls = AtomicUsize::new(0);

        cache.get_or_refresh(|| load_numbers(&calls)).await;
        tokio::time::advance(INSTRUMENT_TTL + Duration::from_secs(1)).await;
        assert!(cache.fresh().await.is_none());

        let rebuilt = cache.get_or_refresh(|| load_numbers(&calls)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*rebuilt, vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_at_tracks_rebuild() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);
        let calls = AtomicUsize::new(0);
        assert!(cache.expires_at().await.is_none());

        let before = Instant::now();
        cache.get_or_refresh(|| load_numbers(&calls)).await;

        assert_eq!(cache.expires_at().await, Some(before + INSTRUMENT_TTL));
    }

    #[tokio::test]
    async fn test_failed_rebuild_degrades_to_empty() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);

        let value = cache
            .get_or_refresh(|| async { Err(MarketDataError::parse("bad body")) })
            .await;

        assert!(value.is_empty());
        assert!(cache.fresh().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_rebuild_keeps_previous_snapshot() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);
        let calls = AtomicUsize::new(0);
        cache.get_or_refresh(|| load_numbers(&calls)).await;
        let stored = cache.expires_at().await;

        tokio::time::advance(INSTRUMENT_TTL * 2).await;
        let value = cache
            .get_or_refresh(|| async { Err(MarketDataError::parse("bad body")) })
            .await;

        assert!(value.is_empty());
        assert_eq!(cache.expires_at().await, stored);
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let cache: TtlCache<Vec<u32>> = TtlCache::new("numbers", INSTRUMENT_TTL);
        let calls = AtomicUsize::new(0);

        cache.get_or_refresh(|| load_numbers(&calls)).await;
        cache.invalidate().await;
        cache.get_or_refresh(|| load_numbers(&calls)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
