//! Snapshot cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Available cache backends.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process map. Lost on restart.
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Connection URL, required when `backend = "redis"` (e.g. "redis://localhost:6379/0").
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Key holding the serialized snapshot list.
    #[serde(default = "default_key")]
    pub key: String,

    /// Snapshot time-to-live in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Upper bound on a single backend call, in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_key() -> String {
    "status:lines".to_string()
}

fn default_ttl() -> u64 {
    180
}

fn default_timeout() -> u64 {
    2000
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: None,
            key: default_key(),
            ttl_secs: default_ttl(),
            timeout_ms: default_timeout(),
        }
    }
}
