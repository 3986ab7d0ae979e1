//! Composable animation descriptions
//!
//! A [`Track`] is a static description; the runner flattens it into a list
//! of timings with absolute offsets when an animation starts.

use alloc::vec::Vec;

use super::easing::Easing;
use super::value::AnimatedValue;

/// Animation description
#[derive(Debug, Clone)]
pub enum Track {
    /// Move `value` from wherever it is when this timing becomes active to `to`
    Timing {
        value: AnimatedValue,
        to: f32,
        duration_ms: u32,
        easing: Easing,
    },
    /// Wait without touching any value
    Delay(u32),
    /// Run children one after another
    Sequence(Vec<Track>),
    /// Run children together; finishes when the longest finishes
    Parallel(Vec<Track>),
}

impl Track {
    /// Timing with the default easing
    pub fn timing(value: &AnimatedValue, to: f32, duration_ms: u32) -> Self {
        Self::timing_with(value, to, duration_ms, Easing::default())
    }

    /// Timing with an explicit easing
    pub fn timing_with(value: &AnimatedValue, to: f32, duration_ms: u32, easing: Easing) -> Self {
        Track::Timing {
            value: value.clone(),
            to,
            duration_ms,
            easing,
        }
    }

    /// Total duration in milliseconds
    pub fn duration_ms(&self) -> u32 {
        match self {
            Track::Timing { duration_ms, .. } => *duration_ms,
            Track::Delay(ms) => *ms,
            Track::Sequence(children) => children.iter().map(Track::duration_ms).sum(),
            Track::Parallel(children) => children.iter().map(Track::duration_ms).max().unwrap_or(0),
        }
    }

    /// Flatten into timings with absolute start offsets
    ///
    /// Output order follows the description order, so for any one value a
    /// later timing in a sequence appears after an earlier one.
    pub(crate) fn schedule(&self) -> Vec<ScheduledTiming> {
        let mut out = Vec::new();
        self.schedule_into(0, &mut out);
        out
    }

    fn schedule_into(&self, offset_ms: u32, out: &mut Vec<ScheduledTiming>) {
        match self {
            Track::Timing {
                value,
                to,
                duration_ms,
                easing,
            } => out.push(ScheduledTiming {
                value: value.clone(),
                to: *to,
                start_ms: offset_ms,
                duration_ms: *duration_ms,
                easing: *easing,
                from: None,
                origin: None,
                done: false,
            }),
            Track::Delay(_) => {}
            Track::Sequence(children) => {
                let mut at = offset_ms;
                for child in children {
                    child.schedule_into(at, out);
                    at += child.duration_ms();
                }
            }
            Track::Parallel(children) => {
                for child in children {
                    child.schedule_into(offset_ms, out);
                }
            }
        }
    }
}

/// Runtime state of one timing inside a running animation
#[derive(Debug, Clone)]
pub(crate) struct ScheduledTiming {
    value: AnimatedValue,
    to: f32,
    start_ms: u32,
    duration_ms: u32,
    easing: Easing,
    /// Start value of the current iteration, captured on activation
    from: Option<f32>,
    /// Start value of the first iteration
    origin: Option<f32>,
    done: bool,
}

impl ScheduledTiming {
    /// Apply this timing at `elapsed_ms` since the animation started
    pub(crate) fn apply(&mut self, elapsed_ms: u32) {
        if self.done || elapsed_ms < self.start_ms {
            return;
        }

        let from = match self.from {
            Some(from) => from,
            None => {
                let from = self.value.get();
                self.from = Some(from);
                self.origin.get_or_insert(from);
                from
            }
        };

        let local = elapsed_ms - self.start_ms;
        if local >= self.duration_ms {
            self.value.set(self.to);
            self.done = true;
            return;
        }

        let t = self.easing.apply(local as f32 / self.duration_ms as f32);
        self.value.set(from + (self.to - from) * t);
    }

    /// Rewind for another iteration, restoring the first-iteration start value
    pub(crate) fn rewind(&mut self) {
        if let Some(origin) = self.origin {
            self.value.set(origin);
        }
        self.from = None;
        self.done = false;
    }
}
