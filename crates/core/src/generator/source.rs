use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::lines::LineId;
use crate::status::Status;

/// Cumulative thresholds for the status draw: GOOD 0.80, DELAYS 0.15, PLANNED 0.05.
const GOOD_CUTOFF: f64 = 0.80;
const DELAYS_CUTOFF: f64 = 0.95;

/// One sampled observation for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDraw {
    pub status: Status,
    /// How long before detection the condition began.
    pub onset_offset_minutes: u32,
}

/// Source of per-line status draws.
pub trait StatusSource: Send + Sync {
    fn draw(&self, line: &LineId) -> StatusDraw;
}

/// Draws statuses from the fixed categorical distribution.
pub struct RandomStatusSource {
    rng: Mutex<StdRng>,
    max_onset_minutes: u32,
}

impl RandomStatusSource {
    pub fn new(max_onset_minutes: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            max_onset_minutes,
        }
    }

    pub fn seeded(seed: u64, max_onset_minutes: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max_onset_minutes,
        }
    }

    fn status_for(roll: f64) -> Status {
        if roll < GOOD_CUTOFF {
            Status::Good
        } else if roll < DELAYS_CUTOFF {
            Status::Delays
        } else {
            Status::Planned
        }
    }
}

impl StatusSource for RandomStatusSource {
    fn draw(&self, _line: &LineId) -> StatusDraw {
        // A poisoned lock only means another draw panicked; the rng state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let status = Self::status_for(rng.gen::<f64>());
        let onset_offset_minutes = rng.gen_range(0..=self.max_onset_minutes);
        StatusDraw {
            status,
            onset_offset_minutes,
        }
    }
}
