//! Mock cache backend for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{CacheError, KvStore, MemoryKvStore};

/// In-memory [`KvStore`] with switchable failure and call counters.
///
/// While failing, every call returns [`CacheError::Backend`], standing in for
/// an unreachable cache server.
#[derive(Default)]
pub struct MockKvStore {
    inner: MemoryKvStore,
    failing: AtomicBool,
    sets: AtomicUsize,
    gets: AtomicUsize,
}

impl MockKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `set_with_ttl` calls, failed ones included.
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Number of `get` calls, failed ones included.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::Backend("mock cache unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KvStore for MockKvStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(key).await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
