//! Delay-risk heuristic.
//!
//! This is a stand-in, not a model: the estimate depends only on the line's
//! current cached status. History is not consulted.

use serde::{Deserialize, Serialize};

use crate::lines::LineId;
use crate::status::{Status, StatusSnapshot};

/// Default forecast horizon echoed back to callers, in minutes.
pub const DEFAULT_HORIZON_MINUTES: u32 = 15;

const HIGH_THRESHOLD: f64 = 0.6;
const MED_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Med,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if probability >= MED_THRESHOLD {
            RiskLevel::Med
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Med => "MED",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Delay probability for a line's current status. A line with no cached
/// status is treated as GOOD.
pub fn delay_probability(status: Option<Status>) -> f64 {
    match status {
        Some(Status::Delays) => 0.75,
        Some(Status::Planned) => 0.45,
        Some(Status::Good) | None => 0.12,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub line: LineId,
    pub horizon_minutes: u32,
    pub prob_delay: f64,
    pub risk: RiskLevel,
}

/// Estimate delay risk for `line` from the current snapshot set.
pub fn forecast(snapshot: &[StatusSnapshot], line: &LineId, horizon_minutes: u32) -> Forecast {
    let status = snapshot
        .iter()
        .find(|entry| entry.line == *line)
        .map(|entry| entry.status);
    let prob_delay = delay_probability(status);

    Forecast {
        line: *line,
        horizon_minutes,
        prob_delay,
        risk: RiskLevel::from_probability(prob_delay),
    }
}
