//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingest cycles (runs, skips, duration)
//! - Backend writes and reads (cache, event store)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ingest Cycle Metrics
// =============================================================================

/// Ingest cycles by result.
pub static INGEST_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pulse_ingest_cycles_total", "Total ingest cycles run"),
        &["result"], // "ok", "partial", "failed"
    )
    .unwrap()
});

/// Scheduler triggers dropped because a cycle was still running.
pub static INGEST_CYCLES_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pulse_ingest_cycles_skipped_total",
        "Scheduler triggers skipped while a cycle was in flight",
    )
    .unwrap()
});

/// Ingest cycle duration in seconds.
pub static INGEST_CYCLE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pulse_ingest_cycle_duration_seconds",
            "Duration of one ingest cycle",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Backend Metrics
// =============================================================================

/// Events written to the event store.
pub static EVENTS_APPENDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pulse_events_appended_total",
        "Total events appended to the event store",
    )
    .unwrap()
});

/// Backend failures by backend and operation.
pub static BACKEND_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pulse_backend_failures_total", "Total backend call failures"),
        &["backend", "operation"], // backend: "cache", "store"
    )
    .unwrap()
});

/// Snapshot cache reads by result.
pub static CACHE_READS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pulse_cache_reads_total", "Snapshot cache reads"),
        &["result"], // "hit", "miss", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingest
        Box::new(INGEST_CYCLES.clone()),
        Box::new(INGEST_CYCLES_SKIPPED.clone()),
        Box::new(INGEST_CYCLE_DURATION.clone()),
        // Backends
        Box::new(EVENTS_APPENDED.clone()),
        Box::new(BACKEND_FAILURES.clone()),
        Box::new(CACHE_READS.clone()),
    ]
}
