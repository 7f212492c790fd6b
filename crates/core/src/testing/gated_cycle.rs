//! Controllable ingest cycle for scheduler tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::pipeline::IngestCycle;

const POLL: Duration = Duration::from_millis(5);
const MAX_POLLS: usize = 2_000;

/// An [`IngestCycle`] that can be held open, counted, or made to panic.
pub struct GatedCycle {
    open: AtomicBool,
    gate: Notify,
    panic_next: AtomicBool,
    entered: AtomicUsize,
    completed: AtomicUsize,
}

impl GatedCycle {
    fn build(open: bool, panic_next: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
            gate: Notify::new(),
            panic_next: AtomicBool::new(panic_next),
            entered: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Cycles block until [`release`](Self::release) is called.
    pub fn gated() -> Self {
        Self::build(false, false)
    }

    /// Cycles complete immediately.
    pub fn open() -> Self {
        Self::build(true, false)
    }

    /// The first cycle panics; later ones complete immediately.
    pub fn panicking_once() -> Self {
        Self::build(true, true)
    }

    /// Open the gate for all current and future cycles.
    pub fn release(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub async fn wait_until_entered(&self, n: usize) {
        Self::poll_until(|| self.entered() >= n, "entered", n).await;
    }

    pub async fn wait_until_completed(&self, n: usize) {
        Self::poll_until(|| self.completed() >= n, "completed", n).await;
    }

    async fn poll_until(done: impl Fn() -> bool, what: &str, n: usize) {
        for _ in 0..MAX_POLLS {
            if done() {
                return;
            }
            tokio::time::sleep(POLL).await;
        }
        panic!("gated cycle never {what} {n} times");
    }
}

#[async_trait]
impl IngestCycle for GatedCycle {
    async fn run_cycle(&self) {
        self.entered.fetch_add(1, Ordering::SeqCst);

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("gated cycle panic");
        }

        loop {
            let notified = self.gate.notified();
            if self.open.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}
