//! Simulated status generation.
//!
//! A [`Generator`] turns one draw per catalog line into a [`CycleBatch`]. The
//! draws come from a [`StatusSource`], so tests can script them instead of
//! sampling the random distribution.

mod config;
mod source;

pub use config::GeneratorConfig;
pub use source::{RandomStatusSource, StatusDraw, StatusSource};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::lines::LineId;
use crate::status::{StatusSnapshot, TransitEvent};

/// Output of one generation pass: one snapshot and one event per catalog line.
#[derive(Debug, Clone, Default)]
pub struct CycleBatch {
    pub snapshots: Vec<StatusSnapshot>,
    pub events: Vec<TransitEvent>,
}

impl CycleBatch {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

pub struct Generator {
    source: Arc<dyn StatusSource>,
    source_name: String,
}

impl Generator {
    pub fn new(source: Arc<dyn StatusSource>, source_name: impl Into<String>) -> Self {
        Self {
            source,
            source_name: source_name.into(),
        }
    }

    /// Build a generator backed by [`RandomStatusSource`] from config.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let source = match config.seed {
            Some(seed) => RandomStatusSource::seeded(seed, config.max_onset_minutes),
            None => RandomStatusSource::new(config.max_onset_minutes),
        };
        Self::new(Arc::new(source), config.source_name.clone())
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Draw a fresh status for every catalog line. Stateless across calls.
    pub fn generate(&self, now: DateTime<Utc>) -> CycleBatch {
        let mut batch = CycleBatch::default();

        for line in LineId::all() {
            let draw = self.source.draw(&line);
            let started_at = now - Duration::minutes(i64::from(draw.onset_offset_minutes));

            batch
                .snapshots
                .push(StatusSnapshot::new(line, draw.status, now));
            batch.events.push(TransitEvent::new(
                self.source_name.as_str(),
                line,
                draw.status,
                started_at,
            ));
        }

        batch
    }
}
