use super::{types::Config, ConfigError};
use crate::cache::CacheBackend;

/// Validate configuration
/// Currently validates:
/// - Database section exists (enforced by serde)
/// - Server port is not 0
/// - Cache TTL and scheduler interval are not 0
/// - Redis backend has a URL
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    // Cache validation
    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.key cannot be empty".to_string(),
        ));
    }

    if config.cache.backend == CacheBackend::Redis
        && config
            .cache
            .redis_url
            .as_deref()
            .is_none_or(|url| url.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "cache.redis_url is required when cache.backend = \"redis\"".to_string(),
        ));
    }

    // Scheduler validation
    if config.scheduler.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::config::{DatabaseConfig, ForecastConfig, ServerConfig};
    use crate::generator::GeneratorConfig;
    use crate::scheduler::SchedulerConfig;
    use std::net::IpAddr;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::new("pulse.db"),
            cache: CacheConfig::default(),
            scheduler: SchedulerConfig::default(),
            generator: GeneratorConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }

    fn assert_invalid(config: &Config, fragment: &str) {
        match validate_config(config) {
            Err(ConfigError::ValidationError(msg)) => assert!(
                msg.contains(fragment),
                "expected {fragment:?} in {msg:?}"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server = ServerConfig {
            host: "0.0.0.0".parse::<IpAddr>().unwrap(),
            port: 0,
        };
        assert_invalid(&config, "server.port");
    }

    #[test]
    fn test_validate_ttl_zero_fails() {
        let mut config = valid_config();
        config.cache.ttl_secs = 0;
        assert_invalid(&config, "cache.ttl_secs");
    }

    #[test]
    fn test_validate_interval_zero_fails() {
        let mut config = valid_config();
        config.scheduler.interval_secs = 0;
        assert_invalid(&config, "scheduler.interval_secs");
    }

    #[test]
    fn test_validate_redis_requires_url() {
        let mut config = valid_config();
        config.cache.backend = CacheBackend::Redis;
        assert_invalid(&config, "cache.redis_url");

        config.cache.redis_url = Some("  ".to_string());
        assert_invalid(&config, "cache.redis_url");

        config.cache.redis_url = Some("redis://localhost:6379/0".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_database_path_fails() {
        let mut config = valid_config();
        config.database = DatabaseConfig::new("");
        assert_invalid(&config, "database.path");
    }
}
