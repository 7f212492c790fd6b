use std::sync::Arc;

use transit_pulse_core::{Config, IngestScheduler, SanitizedConfig, TransitPulse};

/// Shared application state
pub struct AppState {
    config: Config,
    pulse: Arc<TransitPulse>,
    scheduler: Arc<IngestScheduler>,
}

impl AppState {
    pub fn new(config: Config, pulse: Arc<TransitPulse>, scheduler: Arc<IngestScheduler>) -> Self {
        Self {
            config,
            pulse,
            scheduler,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pulse(&self) -> &TransitPulse {
        self.pulse.as_ref()
    }

    pub fn scheduler(&self) -> &IngestScheduler {
        self.scheduler.as_ref()
    }
}
