//! Ingest scheduler implementation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::config::SchedulerConfig;
use crate::metrics::INGEST_CYCLES_SKIPPED;
use crate::pipeline::IngestCycle;

const IDLE_POLL: Duration = Duration::from_millis(20);

/// Result of asking the scheduler to run a cycle.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A cycle was spawned; the handle resolves when it has finished.
    Started(JoinHandle<()>),
    /// A cycle was already in flight; nothing was spawned.
    Skipped,
}

impl TriggerOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, TriggerOutcome::Started(_))
    }

    /// Wait for the spawned cycle, if any.
    pub async fn wait(self) {
        if let TriggerOutcome::Started(handle) = self {
            if let Err(e) = handle.await {
                error!("Ingest cycle task failed: {}", e);
            }
        }
    }
}

/// Current state of the scheduler.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub in_flight: bool,
    pub interval_secs: u64,
    pub cycles_started: u64,
    pub cycles_skipped: u64,
}

/// State shared between the scheduler handle and its background loop.
struct Shared {
    cycle: Arc<dyn IngestCycle>,
    in_flight: Arc<AtomicBool>,
    cycles_started: AtomicU64,
    cycles_skipped: AtomicU64,
}

/// Clears the in-flight flag when the cycle task ends, including by panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Shared {
    fn dispatch(&self) -> TriggerOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.cycles_skipped.fetch_add(1, Ordering::Relaxed);
            INGEST_CYCLES_SKIPPED.inc();
            debug!("Ingest cycle still running, skipping trigger");
            return TriggerOutcome::Skipped;
        }

        self.cycles_started.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let cycle = Arc::clone(&self.cycle);

        let handle = tokio::spawn(async move {
            let _guard = guard;
            // Run in a child task so a panicking cycle is contained and reported here.
            let result = tokio::spawn(async move { cycle.run_cycle().await }).await;
            if let Err(e) = result {
                error!("Ingest cycle aborted: {}", e);
            }
        });

        TriggerOutcome::Started(handle)
    }
}

/// Drives an [`IngestCycle`] on a fixed period, at most one cycle at a time.
pub struct IngestScheduler {
    config: SchedulerConfig,
    shared: Arc<Shared>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl IngestScheduler {
    pub fn new(config: SchedulerConfig, cycle: Arc<dyn IngestCycle>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            shared: Arc::new(Shared {
                cycle,
                in_flight: Arc::new(AtomicBool::new(false)),
                cycles_started: AtomicU64::new(0),
                cycles_skipped: AtomicU64::new(0),
            }),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            loop_handle: Mutex::new(None),
        }
    }

    /// Start the scheduler.
    ///
    /// Runs the first cycle to completion (when `run_on_start` is set), then
    /// spawns the interval loop. Calling `start` twice is a logged no-op.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Ingest scheduler already running");
            return;
        }

        info!(
            "Starting ingest scheduler (interval {}s)",
            self.config.interval_secs
        );

        if self.config.run_on_start {
            self.trigger().wait().await;
        }

        let handle = self.spawn_interval_loop();
        match self.loop_handle.lock() {
            Ok(mut slot) => *slot = Some(handle),
            Err(poisoned) => *poisoned.into_inner() = Some(handle),
        }

        info!("Ingest scheduler started");
    }

    /// Stop the scheduler and wait (bounded) for an in-flight cycle to finish.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Ingest scheduler not running");
            return;
        }

        info!("Stopping ingest scheduler");

        // Signal shutdown to the interval loop
        let _ = self.shutdown_tx.send(());

        let handle = match self.loop_handle.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Ingest scheduler loop ended abnormally: {}", e);
            }
        }

        let deadline = Instant::now() + self.config.shutdown_grace();
        while self.shared.in_flight.load(Ordering::SeqCst) {
            if Instant::now() >= deadline {
                warn!("Ingest cycle still running after shutdown grace period");
                break;
            }
            tokio::time::sleep(IDLE_POLL).await;
        }

        info!("Ingest scheduler stopped");
    }

    /// Request one cycle now, unless one is already running.
    pub fn trigger(&self) -> TriggerOutcome {
        self.shared.dispatch()
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.running.load(Ordering::Relaxed),
            in_flight: self.shared.in_flight.load(Ordering::Relaxed),
            interval_secs: self.config.interval_secs,
            cycles_started: self.shared.cycles_started.load(Ordering::Relaxed),
            cycles_skipped: self.shared.cycles_skipped.load(Ordering::Relaxed),
        }
    }

    fn spawn_interval_loop(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let running = Arc::clone(&self.running);
        let period = self.config.interval();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Ingest loop started");
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Ingest loop received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        // The cycle runs detached; the loop keeps ticking and
                        // later triggers are skipped while it is in flight.
                        let _ = shared.dispatch();
                    }
                }
            }
            info!("Ingest loop stopped");
        })
    }
}
