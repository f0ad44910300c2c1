use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Contract for the shared TTL key-value store.
///
/// Implementations hold entries for all sessions; isolation comes purely
/// from the `ptit:{session_id}:` key namespace.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Gets a value by key. Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value with an optional TTL, after which the entry expires
    /// autonomously.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value by key, reporting whether it was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Lists every live key starting with the given prefix.
    async fn scan(&self, prefix: &str) -> Result<Vec<String>>;
}
