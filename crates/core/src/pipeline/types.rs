//! Types for the ingest pipeline.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::events::StoreError;

/// Read-path failures. An empty result is never an error.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Snapshot cache unreachable, timed out, or returned garbage.
    #[error("snapshot cache error: {0}")]
    Cache(#[from] CacheError),

    /// Event store failure.
    #[error("event store error: {0}")]
    Store(#[from] StoreError),
}

/// What one ingest cycle managed to do. Informational only; a cycle never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleOutcome {
    /// Lines generated.
    pub lines: usize,
    /// Whether the snapshot cache accepted the new set.
    pub cache_written: bool,
    /// Rows appended to the event store, `None` if the append failed.
    pub events_appended: Option<usize>,
}

impl CycleOutcome {
    pub fn is_complete(&self) -> bool {
        self.cache_written && self.events_appended.is_some()
    }

    /// Metric label: "ok", "partial" or "failed".
    pub fn result_label(&self) -> &'static str {
        match (self.cache_written, self.events_appended.is_some()) {
            (true, true) => "ok",
            (false, false) => "failed",
            _ => "partial",
        }
    }
}

/// A unit of periodic work driven by the scheduler.
#[async_trait]
pub trait IngestCycle: Send + Sync {
    async fn run_cycle(&self);
}
