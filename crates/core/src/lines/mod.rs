//! Catalog of tracked transit lines.
//!
//! The catalog is closed: every identifier handed to the pipeline is one of
//! [`CATALOG`]. Caller-supplied strings go through [`LineId::parse`], which
//! normalizes before checking membership.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Canonical line identifiers, in display order.
pub const CATALOG: &[&str] = &[
    // Letters
    "A", "B", "C", "D", "E", "F", "G", "J", "L", "M", "N", "Q", "R", "W", "Z",
    // Numbers
    "1", "2", "3", "4", "5", "6", "7",
    // Shuttle
    "S",
    // Staten Island Railway
    "SIR",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line identifier is empty")]
    Empty,

    #[error("unknown line: {0}")]
    Unknown(String),
}

/// Trim and uppercase a caller-supplied line identifier.
pub fn normalize_line(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Whether `raw` names a catalog line once normalized.
pub fn is_valid_line(raw: &str) -> bool {
    let normalized = normalize_line(raw);
    CATALOG.contains(&normalized.as_str())
}

/// Catalog identifiers sorted lexicographically (digits before letters).
pub fn sorted_lines() -> Vec<&'static str> {
    let mut lines = CATALOG.to_vec();
    lines.sort_unstable();
    lines
}

/// A validated catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(&'static str);

impl LineId {
    /// Normalize `raw` and resolve it against the catalog.
    pub fn parse(raw: &str) -> Result<Self, LineError> {
        let normalized = normalize_line(raw);
        if normalized.is_empty() {
            return Err(LineError::Empty);
        }
        CATALOG
            .iter()
            .find(|line| **line == normalized)
            .map(|line| LineId(*line))
            .ok_or(LineError::Unknown(normalized))
    }

    /// Every catalog line, in display order.
    pub fn all() -> impl Iterator<Item = LineId> {
        CATALOG.iter().map(|line| LineId(*line))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LineId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
