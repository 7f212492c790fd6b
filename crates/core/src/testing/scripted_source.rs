//! Deterministic status source for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::generator::{StatusDraw, StatusSource};
use crate::lines::LineId;
use crate::status::Status;

/// A [`StatusSource`] that returns scripted draws.
///
/// Lines without a script get the default draw. A scripted line yields its
/// queued draws in order; the last one repeats once the queue is down to one.
pub struct ScriptedStatusSource {
    default: StatusDraw,
    scripts: Mutex<HashMap<LineId, VecDeque<StatusDraw>>>,
}

impl ScriptedStatusSource {
    /// Every line draws `status` with no onset backdate.
    pub fn uniform(status: Status) -> Self {
        Self {
            default: StatusDraw {
                status,
                onset_offset_minutes: 0,
            },
            scripts: Mutex::new(HashMap::new()),
        }
    }

    /// Every line draws GOOD.
    pub fn all_good() -> Self {
        Self::uniform(Status::Good)
    }

    /// Pin one line to `status`, backdated by `onset_offset_minutes`.
    pub fn with_line(self, raw_line: &str, status: Status, onset_offset_minutes: u32) -> Self {
        self.with_draws(
            raw_line,
            vec![StatusDraw {
                status,
                onset_offset_minutes,
            }],
        )
    }

    /// Script successive statuses for one line, one per cycle.
    pub fn with_sequence(self, raw_line: &str, statuses: &[Status]) -> Self {
        let draws = statuses
            .iter()
            .map(|status| StatusDraw {
                status: *status,
                onset_offset_minutes: 0,
            })
            .collect();
        self.with_draws(raw_line, draws)
    }

    fn with_draws(self, raw_line: &str, draws: Vec<StatusDraw>) -> Self {
        let line = LineId::parse(raw_line)
            .unwrap_or_else(|e| panic!("scripted line {raw_line:?}: {e}"));
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(line, draws.into_iter().collect());
        }
        self
    }
}

impl StatusSource for ScriptedStatusSource {
    fn draw(&self, line: &LineId) -> StatusDraw {
        let mut scripts = self
            .scripts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match scripts.get_mut(line) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(self.default),
            Some(queue) => queue.front().copied().unwrap_or(self.default),
            None => self.default,
        }
    }
}
