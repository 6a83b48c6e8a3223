//! Time-boxed response cache.
//!
//! Responses are stored in the [`KeyValueStore`] under
//! `cache:{namespace}:{query key}` together with the time they were cached.
//! An entry is served only while `now - cached_at < ttl`. Writes to a
//! resource clear its whole namespace.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::traits::{Clock, KeyValueStore, StoreError};

/// Prefix shared by every cache key in the store.
const CACHE_PREFIX: &str = "cache:";

/// A cached response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    /// Response body exactly as received
    pub payload: String,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.cached_at < ttl
    }
}

/// Where a successful read came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Network,
    /// Served from cache after the network call failed
    Cache { cached_at: DateTime<Utc> },
}

/// Data plus its origin, returned by cached reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Cached<T> {
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Network,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.origin, DataOrigin::Cache { .. })
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Cached<U> {
        Cached {
            data: f(self.data),
            origin: self.origin,
        }
    }
}

/// One resource's cache namespace.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: &'static str,
    ttl: Duration,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl ResponseCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        namespace: &'static str,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            namespace,
            ttl,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn prefix(&self) -> String {
        format!("{}{}:", CACHE_PREFIX, self.namespace)
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }

    /// Store `payload` under `key`, stamped with the current time.
    pub async fn put(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        let entry = CacheEntry {
            key: key.to_string(),
            payload: payload.to_string(),
            cached_at: self.clock.now(),
        };
        let json =
            serde_json::to_string(&entry).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let storage_key = self.storage_key(key);
        self.blocking(move |store| store.put(&storage_key, &json))
            .await
    }

    /// Read `key` if it exists and has not expired.
    pub async fn get_fresh(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let storage_key = self.storage_key(key);
        let raw = self.blocking(move |store| store.get(&storage_key)).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let entry: CacheEntry =
            serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
        if entry.is_fresh(self.clock.now(), self.ttl) {
            Ok(Some(entry))
        } else {
            tracing::debug!(namespace = self.namespace, key, "cache entry expired");
            Ok(None)
        }
    }

    /// Drop every entry of this namespace.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let prefix = self.prefix();
        let removed = self
            .blocking(move |store| store.remove_prefix(&prefix))
            .await?;
        tracing::debug!(namespace = self.namespace, removed, "cache cleared");
        Ok(removed)
    }

    /// Drop expired (and unreadable) entries of this namespace.
    pub async fn purge_expired(&self) -> Result<usize, StoreError> {
        let prefix = self.prefix();
        let now = self.clock.now();
        let ttl = self.ttl;
        self.blocking(move |store| {
            let mut removed = 0;
            for key in store.keys_with_prefix(&prefix)? {
                let keep = store
                    .get(&key)?
                    .and_then(|raw| serde_json::from_str::<CacheEntry>(&raw).ok())
                    .is_some_and(|entry| entry.is_fresh(now, ttl));
                if !keep {
                    store.remove(&key)?;
                    removed += 1;
                }
            }
            Ok(removed)
        })
        .await
    }

    async fn blocking<R, F>(&self, op: F) -> Result<R, StoreError>
    where
        R: Send + 'static,
        F: FnOnce(&dyn KeyValueStore) -> Result<R, StoreError> + Send + 'static,
    {
        run_blocking(&self.store, op).await
    }
}

/// Run a synchronous store operation on the blocking pool.
pub(crate) async fn run_blocking<R, F>(store: &Arc<dyn KeyValueStore>, op: F) -> Result<R, StoreError>
where
    R: Send + 'static,
    F: FnOnce(&dyn KeyValueStore) -> Result<R, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::ReadFailed(format!("store task failed: {}", e)))?
}
