use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::{EventStore, StoreError};
use crate::lines::LineId;
use crate::status::{Status, StoredEvent, TransitEvent};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed event store
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        Self::with_busy_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Like [`SqliteEventStore::new`], bounding how long a call waits on a locked database.
    pub fn with_busy_timeout(path: &Path, busy_timeout: Duration) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        conn.busy_timeout(busy_timeout)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite event store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transit_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                line TEXT NOT NULL,
                status TEXT NOT NULL,
                severity INTEGER NOT NULL,
                message TEXT,
                started_at TEXT NOT NULL,
                observed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_transit_events_line_observed
                ON transit_events(line, observed_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    /// Fixed-width UTC timestamps so text ordering matches time ordering.
    fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::CorruptRow(format!("Invalid timestamp {raw:?}: {e}")))
    }
}

// Severity and message are derived from status on read, never trusted from the row.
type EventRow = (i64, String, String, String, String, String);

impl EventStore for SqliteEventStore {
    fn append(&self, events: &[TransitEvent]) -> Result<usize, StoreError> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let observed_at = Self::format_timestamp(&Utc::now());

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO transit_events (source, line, status, severity, message, started_at, observed_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for event in events {
                stmt.execute(params![
                    event.source,
                    event.line.as_str(),
                    event.status.as_str(),
                    event.severity(),
                    event.message,
                    Self::format_timestamp(&event.started_at),
                    observed_at,
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(events.len())
    }

    fn history(&self, line: &LineId, limit: u32) -> Result<Vec<StoredEvent>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, source, line, status, started_at, observed_at
                 FROM transit_events
                 WHERE line = ?
                 ORDER BY observed_at DESC, id DESC
                 LIMIT ?",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![line.as_str(), i64::from(limit)],
                |row| -> rusqlite::Result<EventRow> {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut events = Vec::new();
        for row_result in rows {
            let (id, source, line_str, status_str, started_str, observed_str) =
                row_result.map_err(|e| StoreError::Database(e.to_string()))?;

            let line = LineId::parse(&line_str)
                .map_err(|e| StoreError::CorruptRow(format!("row {id}: {e}")))?;
            let status: Status = status_str
                .parse()
                .map_err(|e| StoreError::CorruptRow(format!("row {id}: {e}")))?;

            events.push(StoredEvent {
                id,
                observed_at: Self::parse_timestamp(&observed_str)?,
                event: TransitEvent::new(
                    source,
                    line,
                    status,
                    Self::parse_timestamp(&started_str)?,
                ),
            });
        }

        Ok(events)
    }

    fn count(&self, line: &LineId) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT COUNT(*) FROM transit_events WHERE line = ?",
            params![line.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }
}
