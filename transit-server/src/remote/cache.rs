//! TTL cache for remote GET responses.
//!
//! Entries are keyed by the full URL plus the query parameters in sorted
//! order, so `{a: 1, b: 2}` and `{b: 2, a: 1}` share an entry. Expiry and
//! synchronisation are handled by moka: a read never sees a half-written
//! entry, and an entry older than the TTL is never returned. Concurrent
//! misses on one key share a single fill.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde_json::Value;

/// Cache key: URL and canonical query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a URL and its query parameters.
    pub fn new(url: &str, params: &BTreeMap<String, String>) -> Self {
        let mut key = String::with_capacity(url.len() + 1);
        key.push_str(url);
        key.push('|');
        for (i, (name, value)) in params.iter().enumerate() {
            if i > 0 {
                key.push('&');
            }
            // Infallible for String
            let _ = write!(key, "{name}={value}");
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry is served before it must be refetched.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Shared cache of decoded JSON responses.
#[derive(Clone)]
pub struct ResponseCache {
    entries: MokaCache<CacheKey, Arc<Value>>,
}

impl ResponseCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Get a fresh entry.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        self.entries.get(key).await
    }

    /// Insert or overwrite an entry, restarting its TTL.
    pub async fn insert(&self, key: CacheKey, value: Arc<Value>) {
        self.entries.insert(key, value).await;
    }

    /// Get a fresh entry, or run `init` to fill it.
    ///
    /// Callers that miss on the same key while a fill is in flight wait for
    /// that fill instead of starting their own, and all of them see its
    /// outcome. A failed fill stores nothing. The flag is true when this
    /// call's `init` produced the value.
    pub async fn get_or_try_insert_with<F, E>(
        &self,
        key: CacheKey,
        init: F,
    ) -> Result<(Arc<Value>, bool), Arc<E>>
    where
        F: Future<Output = Result<Arc<Value>, E>>,
        E: Send + Sync + 'static,
    {
        let entry = self.entries.entry(key).or_try_insert_with(init).await?;
        let fresh = entry.is_fresh();
        Ok((entry.into_value(), fresh))
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate entry count (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}
