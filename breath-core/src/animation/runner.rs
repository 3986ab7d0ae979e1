//! Animation runner
//!
//! Drives a [`Track`] on a [`Clock`] one frame at a time. Each start or stop
//! bumps a generation counter; frame callbacks carrying an older generation
//! are discarded, so an interrupted run can never complete.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use super::track::{ScheduledTiming, Track};
use crate::clock::{Clock, TimerId};
use crate::traits::AnimationDriver;

/// Frame interval used when none is configured (~60 fps)
pub const DEFAULT_FRAME_MS: u32 = 16;

/// Outcome reported to a completion callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationResult {
    /// True if the animation ran to its end; false if stopped or superseded
    pub finished: bool,
}

impl AnimationResult {
    pub const FINISHED: Self = Self { finished: true };
    pub const INTERRUPTED: Self = Self { finished: false };
}

/// Callback invoked once when a run ends
pub type CompletionCallback = Box<dyn FnOnce(AnimationResult)>;

struct Run {
    started_at_ms: u64,
    timings: Vec<ScheduledTiming>,
    frame: Option<TimerId>,
    on_complete: Option<CompletionCallback>,
}

struct RunnerState {
    track: Track,
    total_ms: u32,
    looping: bool,
    frame_ms: u32,
    generation: u64,
    run: Option<Run>,
}

/// Handle to a startable, stoppable animation
///
/// Clones share the same animation.
#[derive(Clone)]
pub struct Animation {
    clock: Clock,
    state: Rc<RefCell<RunnerState>>,
}

impl Animation {
    /// Animation that plays `track` once per start
    pub fn new(clock: &Clock, track: Track) -> Self {
        Self::build(clock, track, false)
    }

    /// Animation that replays `track` until stopped
    pub fn looped(clock: &Clock, track: Track) -> Self {
        Self::build(clock, track, true)
    }

    fn build(clock: &Clock, track: Track, looping: bool) -> Self {
        let total_ms = track.duration_ms();
        Self {
            clock: clock.clone(),
            state: Rc::new(RefCell::new(RunnerState {
                track,
                total_ms,
                looping,
                frame_ms: DEFAULT_FRAME_MS,
                generation: 0,
                run: None,
            })),
        }
    }

    /// Set the frame interval (minimum 1 ms)
    pub fn with_frame_ms(self, frame_ms: u32) -> Self {
        self.state.borrow_mut().frame_ms = frame_ms.max(1);
        self
    }

    /// Total duration of one iteration
    pub fn duration_ms(&self) -> u32 {
        self.state.borrow().total_ms
    }

    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        self.state.borrow().run.is_some()
    }

    /// Current generation token
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Start a run, superseding any run in progress
    ///
    /// The superseded run's callback receives `finished: false`. The first
    /// frame is applied synchronously, so every timing that starts at zero
    /// captures its start value here.
    pub fn start(&self, on_complete: impl FnOnce(AnimationResult) + 'static) {
        // An interrupted callback may restart this animation; that run is
        // superseded as well.
        while self.is_running() {
            self.stop();
        }

        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            let timings = state.track.schedule();
            state.run = Some(Run {
                started_at_ms: self.clock.now_ms(),
                timings,
                frame: None,
                on_complete: Some(Box::new(on_complete)),
            });
            state.generation
        };

        frame(Rc::downgrade(&self.state), self.clock.clone(), generation);
    }

    /// Stop the run in progress
    ///
    /// Values keep whatever they reached. The run's callback receives
    /// `finished: false`. Stopping an idle animation is a no-op.
    pub fn stop(&self) {
        let interrupted = {
            let mut state = self.state.borrow_mut();
            match state.run.take() {
                Some(mut run) => {
                    state.generation += 1;
                    if let Some(id) = run.frame.take() {
                        self.clock.clear_timeout(id);
                    }
                    run.on_complete.take()
                }
                None => None,
            }
        };

        if let Some(on_complete) = interrupted {
            on_complete(AnimationResult::INTERRUPTED);
        }
    }
}

impl AnimationDriver for Animation {
    fn start(&self, on_complete: CompletionCallback) {
        Animation::start(self, on_complete)
    }

    fn stop(&self) {
        Animation::stop(self)
    }
}

/// Apply one frame for `generation` and schedule the next
fn frame(state: Weak<RefCell<RunnerState>>, clock: Clock, generation: u64) {
    let Some(shared) = state.upgrade() else {
        return;
    };

    let completed = {
        let mut guard = shared.borrow_mut();
        let s = &mut *guard;
        if s.generation != generation {
            return;
        }
        let Some(run) = s.run.as_mut() else {
            return;
        };

        let now = clock.now_ms();
        let elapsed = now.saturating_sub(run.started_at_ms).min(u32::MAX as u64) as u32;
        for timing in run.timings.iter_mut() {
            timing.apply(elapsed);
        }

        if elapsed >= s.total_ms && s.looping {
            // Rewind in reverse so the earliest timing of each value wins
            for timing in run.timings.iter_mut().rev() {
                timing.rewind();
            }
            run.started_at_ms = now;
            for timing in run.timings.iter_mut() {
                timing.apply(0);
            }
            schedule_frame(&state, &clock, run, s.frame_ms, s.total_ms, generation);
            None
        } else if elapsed >= s.total_ms {
            s.run.take().and_then(|mut run| run.on_complete.take())
        } else {
            let remaining = s.total_ms - elapsed;
            schedule_frame(&state, &clock, run, s.frame_ms, remaining, generation);
            None
        }
    };

    if let Some(on_complete) = completed {
        on_complete(AnimationResult::FINISHED);
    }
}

fn schedule_frame(
    state: &Weak<RefCell<RunnerState>>,
    clock: &Clock,
    run: &mut Run,
    frame_ms: u32,
    remaining_ms: u32,
    generation: u64,
) {
    // Land the last frame exactly on the end; a zero-length loop still
    // waits one frame per iteration.
    let delay = if remaining_ms == 0 {
        frame_ms
    } else {
        frame_ms.min(remaining_ms)
    };

    let next_state = state.clone();
    let next_clock = clock.clone();
    run.frame = Some(clock.set_timeout(delay, move || {
        frame(next_state, next_clock, generation)
    }));
}
