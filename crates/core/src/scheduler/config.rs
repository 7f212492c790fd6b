//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the periodic ingest scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between ingest triggers.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Run one cycle immediately when the scheduler starts.
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,

    /// How long `stop` waits for an in-flight cycle, in milliseconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_ms: u64,
}

fn default_interval() -> u64 {
    30
}

fn default_run_on_start() -> bool {
    true
}

fn default_shutdown_grace() -> u64 {
    5000
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            run_on_start: default_run_on_start(),
            shutdown_grace_ms: default_shutdown_grace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(30));
        assert!(config.run_on_start);
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            interval_secs = 10
            run_on_start = false
            shutdown_grace_ms = 250
        "#;
        let config: SchedulerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.interval_secs, 10);
        assert!(!config.run_on_start);
        assert_eq!(config.shutdown_grace_ms, 250);
    }
}
