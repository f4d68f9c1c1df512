//! Read-through snapshot cache over the location store
//!
//! Reloads synchronously once the snapshot is older than the TTL. Concurrent
//! readers racing past an expired entry may each trigger a reload; the last
//! writer wins.

use crate::locations::store::LocationStore;
use crate::locations::types::ClientLocation;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

struct CacheEntry {
    snapshot: Arc<Vec<ClientLocation>>,
    captured_at: Instant,
}

/// TTL-bounded cache of the validated location list.
pub struct LocationCache {
    store: Arc<dyn LocationStore>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl LocationCache {
    pub fn new(store: Arc<dyn LocationStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the current snapshot, reloading from the store if the cached
    /// one has expired. Never fails: a load error degrades to an empty list.
    pub async fn get(&self) -> Arc<Vec<ClientLocation>> {
        {
            let guard = self.entry.read();
            if let Some(entry) = guard.as_ref() {
                if entry.captured_at.elapsed() < self.ttl {
                    return Arc::clone(&entry.snapshot);
                }
            }
        }

        // Lock released while reloading; racing readers may reload too.
        let snapshot = Arc::new(self.reload().await);

        let mut guard = self.entry.write();
        *guard = Some(CacheEntry {
            snapshot: Arc::clone(&snapshot),
            captured_at: Instant::now(),
        });
        snapshot
    }

    async fn reload(&self) -> Vec<ClientLocation> {
        let raw = match self.store.load().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to load locations");
                return Vec::new();
            }
        };

        raw.into_iter()
            .filter_map(|record| match record.into_client() {
                Ok(location) => Some(location),
                Err(err) => {
                    warn!(error = %err, "skipping invalid location");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::store::StoreError;
    use crate::locations::types::RawLocation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        loads: AtomicUsize,
        records: Vec<(String, String)>,
    }

    impl CountingStore {
        fn new(records: Vec<(&str, &str)>) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                records: records
                    .into_iter()
                    .map(|(loc, label)| (loc.to_string(), label.to_string()))
                    .collect(),
            }
        }

        fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LocationStore for CountingStore {
        async fn load(&self) -> Result<Vec<RawLocation>, StoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .records
                .iter()
                .map(|(location, as_label)| RawLocation {
                    location: location.clone(),
                    as_label: as_label.clone(),
                    asname: String::new(),
                    details: String::new(),
                })
                .collect())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl LocationStore for FailingStore {
        async fn load(&self) -> Result<Vec<RawLocation>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_fresh_snapshot_is_served_without_reloading() {
        let store = Arc::new(CountingStore::new(vec![("45.0,20.0", "AS1")]));
        let cache = LocationCache::new(store.clone(), Duration::from_secs(60));

        let first = cache.get().await;
        assert_eq!(first.len(), 1);
        assert_eq!(store.load_count(), 1);

        let second = cache.get().await;
        assert_eq!(second.len(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_snapshot_triggers_reload() {
        let store = Arc::new(CountingStore::new(vec![("45.0,20.0", "AS1")]));
        let cache = LocationCache::new(store.clone(), Duration::from_millis(50));

        cache.get().await;
        assert_eq!(store.load_count(), 1);

        cache.get().await;
        assert_eq!(store.load_count(), 1);

        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.get().await;
        assert_eq!(store.load_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_records_are_dropped_individually() {
        let store = Arc::new(CountingStore::new(vec![
            ("91,20", "bad-lat"),
            ("45.0,20.0", "good"),
            ("abc", "bad-format"),
        ]));
        let cache = LocationCache::new(store, Duration::from_secs(60));

        let snapshot = cache.get().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].as_label, "good");
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty_list() {
        let cache = LocationCache::new(Arc::new(FailingStore), Duration::from_secs(60));
        assert!(cache.get().await.is_empty());
    }
}
