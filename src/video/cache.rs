//! In-memory TTL cache for proxied responses.
//!
//! Entries expire `ttl` after they were stored. Concurrent misses for the
//! same key are collapsed so only one caller goes upstream.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

/// Whether a value came from the cache or from the fetch function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Keyed TTL cache. Only successful values are stored.
#[derive(Debug)]
pub struct ResponseCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    ttl: Duration,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// Expired entries are swept on every insert.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(self.ttl));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// At most one `fetch` per key runs at a time; callers arriving while it
    /// runs wait and then read what it stored. Errors are returned as-is and
    /// never cached.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns on failure.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        fetch: F,
    ) -> Result<(V, CacheStatus), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok((value, CacheStatus::Hit));
        }

        let lock = self.key_lock(&key).await;
        let result = {
            let _guard = lock.lock().await;

            // Someone else may have filled it while we waited.
            if let Some(value) = self.get(&key).await {
                Ok((value, CacheStatus::Hit))
            } else {
                match fetch().await {
                    Ok(value) => {
                        self.insert(key.clone(), value.clone()).await;
                        Ok((value, CacheStatus::Miss))
                    }
                    Err(e) => Err(e),
                }
            }
        };

        self.release_key_lock(&key, &lock).await;
        result
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn key_lock(&self, key: &K) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        Arc::clone(
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    async fn release_key_lock(&self, key: &K, lock: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // Map plus our handle: nobody else is waiting on this key.
        if Arc::strong_count(lock) == 2
            && in_flight.get(key).is_some_and(|l| Arc::ptr_eq(l, lock))
        {
            in_flight.remove(key);
        }
    }
}
