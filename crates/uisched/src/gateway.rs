//! Session-scoped cache-aside gateway.
//!
//! Wraps the shared [`CacheStore`] with deterministic key derivation,
//! get-or-compute and bulk session invalidation. Cache failures never
//! escape this module: a failed read is a miss, a failed write is logged
//! and ignored. The gateway only errors when the compute step errors.
//!
//! Concurrent misses for the same key may both compute and both write
//! (last-write-wins). That stampede is accepted: payloads for one key
//! are equivalent, so no per-key in-flight de-duplication is done.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use uisched_core::cache::{
    api_key, deserialize_value, serialize_value, session_prefix, ApiType, CacheParams, CacheStore,
};
use uisched_core::schedule::DaySchedule;
use uisched_core::session::SessionContext;

use crate::error::Result;

/// Decides whether a computed value is worth writing back.
///
/// Mirrors the upstream rule of only caching non-empty payloads, so a
/// transient empty response never shadows real data for a whole TTL.
pub trait Cacheable {
    fn should_cache(&self) -> bool {
        true
    }
}

impl<T> Cacheable for Vec<T> {
    fn should_cache(&self) -> bool {
        !self.is_empty()
    }
}

impl Cacheable for String {
    fn should_cache(&self) -> bool {
        !self.is_empty()
    }
}

// A day with zero classes is still a definitive answer; cache it.
impl Cacheable for DaySchedule {}

/// Cache diagnostics for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub session_id: String,
    pub keys: Vec<String>,
    pub count: usize,
    pub ttl_seconds: u64,
}

/// Cache-aside wrapper around the shared store.
pub struct CacheGateway<S: CacheStore> {
    store: Arc<S>,
    ttl: Duration,
}

impl<S: CacheStore> CacheGateway<S> {
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for the derived key, or computes, stores
    /// and returns it. The boolean reports whether the value came from
    /// the cache.
    ///
    /// Reads never refresh the TTL. A cached payload that no longer
    /// deserializes into `T` is treated as a miss and overwritten.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        session: &SessionContext,
        api_type: ApiType,
        params: &CacheParams,
        compute: F,
    ) -> Result<(T, bool)>
    where
        T: Serialize + DeserializeOwned + Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = api_key(session.id(), api_type, params);

        match self.store.get(&key).await {
            Ok(Some(bytes)) => match deserialize_value::<T>(&bytes) {
                Ok(value) => {
                    tracing::trace!(%key, "Cache hit");
                    return Ok((value, true));
                }
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Cached payload unreadable, recomputing");
                }
            },
            Ok(None) => {
                tracing::trace!(%key, "Cache miss");
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "Cache read failed, treating as miss");
            }
        }

        let value = compute().await?;

        if value.should_cache() {
            match serialize_value(&value) {
                Ok(bytes) => {
                    if let Err(err) = self.store.set(&key, &bytes, Some(self.ttl)).await {
                        tracing::warn!(%key, error = %err, "Cache write failed");
                    }
                }
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Cache serialization failed");
                }
            }
        }

        Ok((value, false))
    }

    /// Deletes every key under the session's prefix, returning how many
    /// were removed. Store failures degrade to a partial (or zero)
    /// count.
    pub async fn invalidate_session(&self, session: &SessionContext) -> usize {
        let prefix = session_prefix(session.id());
        let keys = match self.store.scan(&prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(%prefix, error = %err, "Cache scan failed during invalidation");
                return 0;
            }
        };

        let mut removed = 0;
        for key in &keys {
            match self.store.delete(key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Cache delete failed during invalidation");
                }
            }
        }

        tracing::debug!(session_id = %session.id(), removed, "Session cache invalidated");
        removed
    }

    /// Lists the session's live cache keys for debugging.
    pub async fn cache_info(&self, session: &SessionContext) -> CacheInfo {
        let prefix = session_prefix(session.id());
        let keys = match self.store.scan(&prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(%prefix, error = %err, "Cache scan failed");
                Vec::new()
            }
        };

        CacheInfo {
            session_id: session.id().to_string(),
            count: keys.len(),
            keys,
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}
