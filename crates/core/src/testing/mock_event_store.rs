//! Mock event store for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::events::{EventStore, StoreError};
use crate::lines::LineId;
use crate::status::{StoredEvent, TransitEvent};

/// Vec-backed [`EventStore`] with switchable failure.
#[derive(Default)]
pub struct MockEventStore {
    rows: Mutex<Vec<StoredEvent>>,
    failing: AtomicBool,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every stored row, in insertion order.
    pub fn all_events(&self) -> Vec<StoredEvent> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Database("mock store unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredEvent>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Database("mock store lock poisoned".to_string()))
    }
}

impl EventStore for MockEventStore {
    fn append(&self, events: &[TransitEvent]) -> Result<usize, StoreError> {
        self.check()?;
        let mut rows = self.rows()?;
        let observed_at = Utc::now();
        for event in events {
            let id = rows.len() as i64 + 1;
            rows.push(StoredEvent {
                id,
                observed_at,
                event: event.clone(),
            });
        }
        Ok(events.len())
    }

    fn history(&self, line: &LineId, limit: u32) -> Result<Vec<StoredEvent>, StoreError> {
        self.check()?;
        let rows = self.rows()?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.event.line == *line)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn count(&self, line: &LineId) -> Result<i64, StoreError> {
        self.check()?;
        let rows = self.rows()?;
        Ok(rows.iter().filter(|row| row.event.line == *line).count() as i64)
    }
}
