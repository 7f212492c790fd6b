use thiserror::Error;

use crate::lines::LineId;
use crate::status::{StoredEvent, TransitEvent};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Trait for event history storage.
///
/// Rows are never updated or deleted. Line identity is not checked here;
/// callers pass validated [`LineId`]s.
pub trait EventStore: Send + Sync {
    /// Persist every event of the batch, all stamped with the same `observed_at`.
    /// Readers see none of the batch until all of it is written.
    /// Returns the number of rows written (0 for an empty batch).
    fn append(&self, events: &[TransitEvent]) -> Result<usize, StoreError>;

    /// At most `limit` events for `line`, most recently observed first.
    fn history(&self, line: &LineId, limit: u32) -> Result<Vec<StoredEvent>, StoreError>;

    /// Number of stored events for `line`.
    fn count(&self, line: &LineId) -> Result<i64, StoreError>;
}
