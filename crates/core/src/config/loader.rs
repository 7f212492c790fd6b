use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `PULSE_CACHE__TTL_SECS=60`.
const ENV_PREFIX: &str = "PULSE_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[database]
path = "pulse.db"

[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_missing_database() {
        let toml = r#"
[server]
port = 8080
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_str_bad_backend() {
        let toml = r#"
[database]
path = "pulse.db"

[cache]
backend = "memcached"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        // Inside a jail so env overrides set by other tests cannot leak in.
        figment::Jail::expect_with(|jail| {
            let mut temp_file = NamedTempFile::new_in(jail.directory())
                .map_err(|e| figment::Error::from(e.to_string()))?;
            writeln!(
                temp_file,
                r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
path = "/tmp/pulse.db"

[scheduler]
interval_secs = 5
"#
            )
            .map_err(|e| figment::Error::from(e.to_string()))?;

            let config = load_config(temp_file.path())
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            assert_eq!(config.scheduler.interval_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "pulse.toml",
                r#"
[database]
path = "file.db"

[cache]
ttl_secs = 180
"#,
            )?;
            jail.set_env("PULSE_CACHE__TTL_SECS", "60");
            jail.set_env("PULSE_SERVER__PORT", "9100");

            let config = load_config(Path::new("pulse.toml"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.cache.ttl_secs, 60);
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.database.path.to_str(), Some("file.db"));
            Ok(())
        });
    }
}
