//! In-memory cache store with LRU eviction.
//!
//! Thread-safe TTL store using tokio synchronization primitives and LRU
//! eviction. Expiry is judged against the injected clock, never the
//! system time, so TTL behavior is testable without sleeping. Expired
//! entries are cleaned up lazily on access.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::RwLock;

use uisched_core::cache::{CacheStore, Result};
use uisched_core::clock::Clock;

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now > expires)
    }
}

/// In-memory cache store shared across all sessions.
///
/// Uses `Arc<RwLock<LruCache>>` for concurrent access and LRU eviction
/// to bound memory when `max_entries` is reached.
#[derive(Clone)]
pub struct MemoryStore {
    store: Arc<RwLock<LruCache<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            clock,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired(now) => {
                store.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl.map(|d| {
            self.clock.now() + chrono::Duration::from_std(d).unwrap_or(chrono::TimeDelta::MAX)
        });
        let entry = Entry {
            value: value.to_vec(),
            expires_at,
        };

        let mut store = self.store.write().await;
        store.put(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        Ok(store.pop(key).is_some())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>> {
        let now = self.clock.now();
        let store = self.store.read().await;

        let mut keys: Vec<String> = store
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
