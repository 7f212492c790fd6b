//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the simulated status generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Value written to the `source` field of every event.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Fixed rng seed. Unset means seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Upper bound (inclusive) of the random onset backdate, in minutes.
    #[serde(default = "default_max_onset")]
    pub max_onset_minutes: u32,
}

fn default_source_name() -> String {
    "simulated_feed".to_string()
}

fn default_max_onset() -> u32 {
    20
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            seed: None,
            max_onset_minutes: default_max_onset(),
        }
    }
}
