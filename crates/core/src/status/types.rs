use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lines::LineId;

const DELAY_MESSAGE: &str = "Signal issues near Bedford Ave";
const PLANNED_MESSAGE: &str = "Planned track work";

/// Service condition of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Good,
    Delays,
    Planned,
}

impl Status {
    /// Disruption ordinal: GOOD 0, PLANNED 1, DELAYS 2.
    pub fn severity(self) -> i64 {
        match self {
            Status::Good => 0,
            Status::Planned => 1,
            Status::Delays => 2,
        }
    }

    /// Rider-facing message attached to this status, if any.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Status::Good => None,
            Status::Delays => Some(DELAY_MESSAGE),
            Status::Planned => Some(PLANNED_MESSAGE),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Good => "GOOD",
            Status::Delays => "DELAYS",
            Status::Planned => "PLANNED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status: {0}")]
pub struct StatusParseError(pub String);

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GOOD" => Ok(Status::Good),
            "DELAYS" => Ok(Status::Delays),
            "PLANNED" => Ok(Status::Planned),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Current status of one line, as held in the snapshot cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub line: LineId,
    pub status: Status,
    #[serde(default)]
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn new(line: LineId, status: Status, updated_at: DateTime<Utc>) -> Self {
        Self {
            line,
            status,
            message: status.message().map(String::from),
            updated_at,
        }
    }
}

/// A status-change event produced by one ingest cycle.
///
/// `severity` and `message` are derived from `status` in [`TransitEvent::new`],
/// the only constructor. Severity is read-only so it cannot drift from status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitEvent {
    pub source: String,
    pub line: LineId,
    pub status: Status,
    severity: i64,
    pub message: Option<String>,
    /// Estimated onset, earlier than detection.
    pub started_at: DateTime<Utc>,
}

impl TransitEvent {
    pub fn new(
        source: impl Into<String>,
        line: LineId,
        status: Status,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            line,
            status,
            severity: status.severity(),
            message: status.message().map(String::from),
            started_at,
        }
    }

    pub fn severity(&self) -> i64 {
        self.severity
    }
}

/// An event as persisted by an [`EventStore`](crate::events::EventStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
    pub id: i64,
    /// Assigned by the store when the batch was written.
    pub observed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: TransitEvent,
}
