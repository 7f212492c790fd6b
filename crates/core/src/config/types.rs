use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CacheBackend, CacheConfig};
use crate::forecast::DEFAULT_HORIZON_MINUTES;
use crate::generator::GeneratorConfig;
use crate::scheduler::SchedulerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Event store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// How long a write waits on a locked database before failing.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn default_busy_timeout() -> u64 {
    5000
}

/// Forecast configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Horizon echoed in forecasts when the caller does not pass one.
    #[serde(default = "default_horizon")]
    pub horizon_minutes: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: default_horizon(),
        }
    }
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_MINUTES
}

/// Sanitized config for API responses (Redis URL redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: SanitizedCacheConfig,
    pub scheduler: SchedulerConfig,
    pub generator: GeneratorConfig,
    pub forecast: ForecastConfig,
}

/// Sanitized cache config (connection URL hidden, it may carry credentials)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCacheConfig {
    pub backend: String,
    pub redis_url_configured: bool,
    pub key: String,
    pub ttl_secs: u64,
    pub timeout_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            cache: SanitizedCacheConfig {
                backend: match config.cache.backend {
                    CacheBackend::Memory => "memory".to_string(),
                    CacheBackend::Redis => "redis".to_string(),
                },
                redis_url_configured: config
                    .cache
                    .redis_url
                    .as_deref()
                    .is_some_and(|url| !url.trim().is_empty()),
                key: config.cache.key.clone(),
                ttl_secs: config.cache.ttl_secs,
                timeout_ms: config.cache.timeout_ms,
            },
            scheduler: config.scheduler.clone(),
            generator: config.generator.clone(),
            forecast: config.forecast.clone(),
        }
    }
}
