//! Periodic, single-flight execution of the ingest cycle.
//!
//! The scheduler is explicit process state: the binary creates one, calls
//! [`IngestScheduler::start`] at boot and [`IngestScheduler::stop`] at shutdown.
//! A trigger that fires while a cycle is still running is dropped, not queued.

mod config;
mod runner;

pub use config::SchedulerConfig;
pub use runner::{IngestScheduler, SchedulerStatus, TriggerOutcome};
