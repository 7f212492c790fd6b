use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{CacheConfig, CacheError, KvStore};
use crate::metrics::CACHE_READS;
use crate::status::StatusSnapshot;

/// The latest full set of per-line statuses, with a fixed expiry.
pub struct SnapshotCache {
    store: Arc<dyn KvStore>,
    key: String,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    pub fn from_config(store: Arc<dyn KvStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.key.clone(), config.ttl())
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the cached set and restart the expiry window.
    pub async fn write(&self, snapshots: &[StatusSnapshot]) -> Result<(), CacheError> {
        let payload = serde_json::to_string(snapshots)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.store.set_with_ttl(&self.key, payload, self.ttl).await?;
        debug!(
            "Cache SET: {} ({} lines, TTL {:?})",
            self.key,
            snapshots.len(),
            self.ttl
        );
        Ok(())
    }

    /// The cached set, or an empty list when nothing fresh is cached.
    pub async fn read(&self) -> Result<Vec<StatusSnapshot>, CacheError> {
        let payload = match self.store.get(&self.key).await {
            Ok(payload) => payload,
            Err(e) => {
                CACHE_READS.with_label_values(&["error"]).inc();
                return Err(e);
            }
        };

        match payload {
            Some(json) => {
                let snapshots = serde_json::from_str(&json).map_err(|e| {
                    CACHE_READS.with_label_values(&["error"]).inc();
                    CacheError::Serialization(format!("Failed to decode snapshot: {e}"))
                })?;
                CACHE_READS.with_label_values(&["hit"]).inc();
                debug!("Cache HIT: {}", self.key);
                Ok(snapshots)
            }
            None => {
                CACHE_READS.with_label_values(&["miss"]).inc();
                debug!("Cache MISS: {}", self.key);
                Ok(Vec::new())
            }
        }
    }
}
