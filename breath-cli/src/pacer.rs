//! Wall-clock pacing for the virtual clock
//!
//! Virtual time tracks total real time since the session started, scaled by
//! the speed factor, so time spent rendering does not accumulate as drift.

use std::time::{Duration, Instant};

/// Maps real elapsed time onto virtual clock advances
#[derive(Debug)]
pub struct Pacer {
    started: Instant,
    speed: u64,
    advanced_ms: u64,
}

impl Pacer {
    pub fn new(speed: u32) -> Self {
        Self {
            started: Instant::now(),
            speed: speed.max(1) as u64,
            advanced_ms: 0,
        }
    }

    /// Virtual milliseconds to advance now
    pub fn due_ms(&mut self) -> u64 {
        self.due_ms_at(self.started.elapsed())
    }

    /// Virtual milliseconds to advance once `elapsed` real time has passed
    fn due_ms_at(&mut self, elapsed: Duration) -> u64 {
        let target = (elapsed.as_millis() as u64).saturating_mul(self.speed);
        let due = target.saturating_sub(self.advanced_ms);
        self.advanced_ms += due;
        due
    }
}
