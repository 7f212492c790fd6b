//! Short-lived cache of the latest status snapshot.
//!
//! The snapshot set is stored as one serialized value under one key, so a
//! write replaces it wholesale and readers see either the previous set or the
//! new one, never a mix.

mod config;
mod memory;
mod redis_store;
mod snapshot;

pub use self::config::{CacheBackend, CacheConfig};
pub use self::memory::MemoryKvStore;
pub use self::redis_store::RedisKvStore;
pub use self::snapshot::SnapshotCache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("cache serialization error: {0}")]
    Serialization(String),

    #[error("cache configuration error: {0}")]
    Configuration(String),
}

/// Key-value store with per-key expiry.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration)
        -> Result<(), CacheError>;

    /// Fetch the value under `key`. Missing and expired keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Backend name for logs and metrics.
    fn backend_name(&self) -> &'static str;
}

/// Build the configured cache backend.
///
/// Only configuration problems fail here; a Redis server is not contacted
/// until the first cache call.
pub async fn create_kv_store(config: &CacheConfig) -> Result<Arc<dyn KvStore>, CacheError> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryKvStore::new())),
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                CacheError::Configuration("cache.redis_url is required for redis".to_string())
            })?;
            let store = RedisKvStore::new(url, config.timeout())?;
            Ok(Arc::new(store))
        }
    }
}
