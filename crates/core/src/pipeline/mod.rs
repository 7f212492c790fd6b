//! The ingest, cache, store and forecast pipeline.
//!
//! [`TransitPulse`] is the single entry point used by the scheduler (write
//! path) and by the HTTP layer (read path).

mod service;
mod types;

pub use service::TransitPulse;
pub use types::{CycleOutcome, IngestCycle, PulseError};
