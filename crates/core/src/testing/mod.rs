//! Testing utilities and mock implementations.
//!
//! This module provides deterministic or failure-injecting stand-ins for every
//! seam of the pipeline, so tests never depend on random sampling, a running
//! Redis, or wall-clock waits.
//!
//! # Example
//!
//! ```rust,ignore
//! use transit_pulse_core::testing::{MockKvStore, ScriptedStatusSource};
//!
//! let source = ScriptedStatusSource::all_good().with_line("L", Status::Delays, 0);
//! let kv = MockKvStore::new();
//! kv.set_failing(true); // every cache call now errors
//! ```

mod gated_cycle;
mod mock_event_store;
mod mock_kv_store;
mod scripted_source;

pub use gated_cycle::GatedCycle;
pub use mock_event_store::MockEventStore;
pub use mock_kv_store::MockKvStore;
pub use scripted_source::ScriptedStatusSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, Utc};

    use super::ScriptedStatusSource;
    use crate::cache::{KvStore, SnapshotCache};
    use crate::events::EventStore;
    use crate::generator::Generator;
    use crate::lines::LineId;
    use crate::pipeline::TransitPulse;
    use crate::status::{Status, StatusSnapshot, TransitEvent};

    /// Source name used by fixture generators.
    pub const TEST_SOURCE: &str = "test_feed";

    /// Parse a catalog line, panicking on typos in test code.
    pub fn line(raw: &str) -> LineId {
        LineId::parse(raw).unwrap_or_else(|e| panic!("fixture line {raw:?}: {e}"))
    }

    /// A full snapshot set with every line at `status`.
    pub fn snapshot_set(status: Status, updated_at: DateTime<Utc>) -> Vec<StatusSnapshot> {
        LineId::all()
            .map(|line| StatusSnapshot::new(line, status, updated_at))
            .collect()
    }

    /// An event for `raw_line` that started `onset_minutes` before now.
    pub fn event(raw_line: &str, status: Status, onset_minutes: i64) -> TransitEvent {
        TransitEvent::new(
            TEST_SOURCE,
            line(raw_line),
            status,
            Utc::now() - chrono::Duration::minutes(onset_minutes),
        )
    }

    /// A pipeline wired to the given source and backends with the default 180 s TTL.
    pub fn pulse(
        source: ScriptedStatusSource,
        kv: Arc<dyn KvStore>,
        store: Arc<dyn EventStore>,
    ) -> TransitPulse {
        TransitPulse::new(
            Generator::new(Arc::new(source), TEST_SOURCE),
            SnapshotCache::new(kv, "status:lines", Duration::from_secs(180)),
            store,
        )
    }
}
