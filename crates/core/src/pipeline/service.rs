//! Pipeline service implementation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use super::types::{CycleOutcome, IngestCycle, PulseError};
use crate::cache::SnapshotCache;
use crate::events::EventStore;
use crate::forecast::{self, Forecast, DEFAULT_HORIZON_MINUTES};
use crate::generator::Generator;
use crate::lines::LineId;
use crate::metrics::{
    BACKEND_FAILURES, EVENTS_APPENDED, INGEST_CYCLES, INGEST_CYCLE_DURATION,
};
use crate::status::{StatusSnapshot, StoredEvent};

/// Generates statuses, publishes them to the cache, records them in the
/// event store, and answers read queries against both.
pub struct TransitPulse {
    generator: Generator,
    cache: SnapshotCache,
    store: Arc<dyn EventStore>,
    horizon_minutes: u32,
}

impl TransitPulse {
    pub fn new(generator: Generator, cache: SnapshotCache, store: Arc<dyn EventStore>) -> Self {
        Self {
            generator,
            cache,
            store,
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
        }
    }

    /// Default horizon reported by [`TransitPulse::forecast`].
    pub fn with_horizon(mut self, horizon_minutes: u32) -> Self {
        self.horizon_minutes = horizon_minutes;
        self
    }

    /// Run one generate, cache-write, store-append pass.
    ///
    /// Backend failures are logged and counted, never returned. A failed cache
    /// write does not stop the store append, and vice versa; the next cycle is
    /// the retry.
    pub async fn run_ingest_cycle(&self) -> CycleOutcome {
        let start = Instant::now();
        let batch = self.generator.generate(Utc::now());

        let cache_written = match self.cache.write(&batch.snapshots).await {
            Ok(()) => true,
            Err(e) => {
                BACKEND_FAILURES.with_label_values(&["cache", "write"]).inc();
                error!(
                    "Failed to write status snapshot to {} cache: {}",
                    self.cache.backend_name(),
                    e
                );
                false
            }
        };

        let events_appended = match self.store.append(&batch.events) {
            Ok(written) => {
                EVENTS_APPENDED.inc_by(written as u64);
                Some(written)
            }
            Err(e) => {
                BACKEND_FAILURES.with_label_values(&["store", "append"]).inc();
                error!("Failed to append {} events: {}", batch.events.len(), e);
                None
            }
        };

        let outcome = CycleOutcome {
            lines: batch.len(),
            cache_written,
            events_appended,
        };

        let label = outcome.result_label();
        INGEST_CYCLES.with_label_values(&[label]).inc();
        INGEST_CYCLE_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        if outcome.is_complete() {
            info!(
                "Ingest cycle complete: {} lines cached, {} events stored",
                outcome.lines,
                outcome.events_appended.unwrap_or(0)
            );
        } else {
            info!("Ingest cycle finished with failures ({})", label);
        }

        outcome
    }

    /// The cached snapshot set; empty when nothing fresh is cached.
    pub async fn get_status_snapshot(&self) -> Result<Vec<StatusSnapshot>, PulseError> {
        self.cache.read().await.map_err(|e| {
            BACKEND_FAILURES.with_label_values(&["cache", "read"]).inc();
            PulseError::from(e)
        })
    }

    /// Up to `limit` events for `line`, most recent first.
    pub fn get_history(&self, line: &LineId, limit: u32) -> Result<Vec<StoredEvent>, PulseError> {
        self.store.history(line, limit).map_err(|e| {
            BACKEND_FAILURES.with_label_values(&["store", "query"]).inc();
            PulseError::from(e)
        })
    }

    /// Delay-risk estimate for `line` from the cached snapshot.
    ///
    /// `horizon_minutes` only labels the result; `None` uses the configured default.
    pub async fn forecast(
        &self,
        line: &LineId,
        horizon_minutes: Option<u32>,
    ) -> Result<Forecast, PulseError> {
        let snapshot = self.get_status_snapshot().await?;
        let horizon = horizon_minutes.unwrap_or(self.horizon_minutes);
        let result = forecast::forecast(&snapshot, line, horizon);
        debug!(
            "Forecast for {}: p={} risk={}",
            line,
            result.prob_delay,
            result.risk.as_str()
        );
        Ok(result)
    }
}

#[async_trait]
impl IngestCycle for TransitPulse {
    async fn run_cycle(&self) {
        self.run_ingest_cycle().await;
    }
}
