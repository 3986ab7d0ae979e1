//! Exercise orchestrator
//!
//! Owns every animated value of one exercise session and wires the step
//! sequencer to its side effects:
//!
//! - Mount plays the entrance animation, then starts the sequencer
//! - Each step start plays the step's sound cue and drives the minimized
//!   circle
//! - Unmount stops everything unconditionally
//! - Close reports whether the session lasted long enough

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec;
use core::cell::{Cell, RefCell};

use super::visuals::{CircleVisuals, StepView};
use crate::animation::value::CIRCLE_RANGE;
use crate::animation::{AnimatedValue, Animation, Easing, Track};
use crate::clock::Clock;
use crate::config::{ActiveSteps, ConfigError, ExerciseConfig, Step, StepId};
use crate::sequencer::{step_animations, SequencerError, SequencerState, StepSequencer, StepValues};
use crate::state::{Event, State};
use crate::ticker::{Ticker, TickerError};
use crate::traits::{SoundCue, SoundPlayer};

/// Check if a session lasted long enough to count
///
/// Reaching the threshold exactly counts as done.
pub fn is_breathing_done(elapsed_ms: u64, min_elapsed_ms: u64) -> bool {
    elapsed_ms >= min_elapsed_ms
}

/// Exercise errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExerciseError {
    /// Invalid session configuration
    Config(ConfigError),
    /// Sequencer could not be built
    Sequencer(SequencerError),
    /// Elapsed-time ticker could not be started
    Ticker(TickerError),
}

impl From<ConfigError> for ExerciseError {
    fn from(e: ConfigError) -> Self {
        ExerciseError::Config(e)
    }
}

impl From<SequencerError> for ExerciseError {
    fn from(e: SequencerError) -> Self {
        ExerciseError::Sequencer(e)
    }
}

impl From<TickerError> for ExerciseError {
    fn from(e: TickerError) -> Self {
        ExerciseError::Ticker(e)
    }
}

/// What a step start does to the minimized circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MinimizedAction {
    /// Start pulsing (if not already)
    Start,
    /// Stop pulsing and return to rest
    Stop,
    /// Leave as is
    Keep,
}

impl MinimizedAction {
    pub fn for_step(id: StepId) -> Self {
        match id {
            StepId::Exhale => MinimizedAction::Start,
            StepId::Inhale => MinimizedAction::Stop,
            StepId::AfterInhale | StepId::AfterExhale => MinimizedAction::Keep,
        }
    }
}

/// Animated values owned by one exercise
#[derive(Debug, Clone)]
pub struct ExerciseValues {
    /// Breathing circle (0 = empty, 1 = full)
    pub circle: AnimatedValue,
    /// Step label opacity
    pub label: AnimatedValue,
    /// Entrance progress
    pub entrance: AnimatedValue,
    /// Minimized circle pulse
    pub minimized: AnimatedValue,
}

impl ExerciseValues {
    pub fn new() -> Self {
        Self {
            circle: AnimatedValue::new(0.0, CIRCLE_RANGE),
            label: AnimatedValue::unit(0.0),
            entrance: AnimatedValue::unit(0.0),
            minimized: AnimatedValue::unit(0.0),
        }
    }
}

impl Default for ExerciseValues {
    fn default() -> Self {
        Self::new()
    }
}

/// One exercise session
pub struct Exercise<S: SoundPlayer + 'static> {
    config: ExerciseConfig,
    values: ExerciseValues,
    state: Rc<Cell<State>>,
    sequencer: StepSequencer,
    entrance: Animation,
    minimized: Animation,
    elapsed: Ticker,
    elapsed_ms: Rc<Cell<u64>>,
    sound: Rc<RefCell<S>>,
    on_close: Box<dyn FnMut(bool)>,
}

impl<S: SoundPlayer + 'static> Exercise<S> {
    /// Build a session; nothing runs until [`mount`](Self::mount)
    ///
    /// Fails if no step is active or a timing parameter is unusable.
    pub fn new(
        clock: &Clock,
        config: ExerciseConfig,
        sound: S,
        on_close: impl FnMut(bool) + 'static,
    ) -> Result<Self, ExerciseError> {
        let steps = config.active_steps()?;
        if config.timing.elapsed_tick_ms == 0 {
            return Err(ExerciseError::Ticker(TickerError::ZeroPeriod));
        }

        let timing = &config.timing;
        let values = ExerciseValues::new();
        let sound = Rc::new(RefCell::new(sound));

        let entrance = Animation::new(
            clock,
            Track::timing_with(&values.entrance, 1.0, timing.entrance_ms, Easing::EaseOut),
        )
        .with_frame_ms(timing.frame_ms);

        let half_pulse = timing.minimized_pulse_ms / 2;
        let minimized = Animation::looped(
            clock,
            Track::Sequence(vec![
                Track::timing(&values.minimized, 1.0, half_pulse),
                Track::timing(&values.minimized, 0.0, half_pulse),
            ]),
        )
        .with_frame_ms(timing.frame_ms);

        let step_values = StepValues {
            circle: values.circle.clone(),
            label: values.label.clone(),
        };
        let animations = step_animations(clock, &steps, &step_values, timing);

        let on_step_start = step_start_handler(
            steps.clone(),
            sound.clone(),
            minimized.clone(),
            values.minimized.clone(),
        );
        let sequencer = StepSequencer::new(steps, animations, on_step_start)?;

        Ok(Self {
            config,
            values,
            state: Rc::new(Cell::new(State::Unmounted)),
            sequencer,
            entrance,
            minimized,
            elapsed: Ticker::new(clock.clone()),
            elapsed_ms: Rc::new(Cell::new(0)),
            sound,
            on_close: Box::new(on_close),
        })
    }

    /// Show the exercise: entrance animation, then the step loop
    ///
    /// Only acts on an unmounted exercise.
    pub fn mount(&mut self) -> Result<(), ExerciseError> {
        if !self.apply(Event::Mount) {
            return Ok(());
        }

        info!(
            "exercise: mount ({} active steps, cycle {} ms)",
            self.sequencer.steps().len(),
            self.sequencer.steps().cycle_ms()
        );
        if self.config.vibration_enabled {
            debug!("exercise: vibration requested, no haptics backend");
        }

        let elapsed = self.elapsed_ms.clone();
        let period = self.config.timing.elapsed_tick_ms;
        self.elapsed
            .start_with(move || elapsed.set(elapsed.get() + period as u64), period)?;

        let state = self.state.clone();
        let sequencer = self.sequencer.clone();
        self.entrance.start(move |result| {
            if !result.finished {
                return;
            }
            let next = state.get().transition(Event::EntranceFinished);
            state.set(next);
            if next.sequence_allowed() {
                sequencer.start();
            }
        });

        Ok(())
    }

    /// Tear down: stop the loop, the entrance, the minimized circle and the
    /// elapsed ticker
    ///
    /// Runs every stop regardless of state, so nothing started by this
    /// exercise can fire afterwards. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let was = self.state.get();
        self.apply(Event::Unmount);

        self.sequencer.stop();
        self.entrance.stop();
        self.minimized.stop();
        self.elapsed.stop();

        if !was.is_terminal() {
            self.sound.borrow_mut().stop_all();
            info!("exercise: unmount after {} ms", self.elapsed_ms.get());
        }
    }

    /// Report completion using the tracked elapsed time
    ///
    /// Invokes the close callback with `is_breathing_done` and returns it.
    pub fn close(&mut self) -> bool {
        self.close_with(self.elapsed_ms.get())
    }

    /// Report completion using a caller-supplied elapsed time
    pub fn close_with(&mut self, elapsed_ms: u64) -> bool {
        let done = is_breathing_done(elapsed_ms, self.config.min_elapsed_ms);
        info!(
            "exercise: close after {} ms (min {} ms), done={}",
            elapsed_ms, self.config.min_elapsed_ms, done
        );
        (self.on_close)(done);
        done
    }

    /// Lifecycle state
    pub fn state(&self) -> State {
        self.state.get()
    }

    /// Sequencer position
    pub fn sequencer_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Step being played
    pub fn current_step(&self) -> Option<&Step> {
        self.sequencer.current_step()
    }

    /// Steps being looped over
    pub fn active_steps(&self) -> &ActiveSteps {
        self.sequencer.steps()
    }

    /// Elapsed time counted since mount (ms)
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }

    /// Animated values
    pub fn values(&self) -> &ExerciseValues {
        &self.values
    }

    /// Check if the exercise is on screen (entering or breathing)
    pub fn is_mounted(&self) -> bool {
        self.state.get().is_mounted()
    }

    /// Session configuration
    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Check if the minimized circle is pulsing
    pub fn is_minimized_pulsing(&self) -> bool {
        self.minimized.is_running()
    }

    /// Visual properties for the current frame
    pub fn visuals(&self) -> CircleVisuals {
        let state = self.sequencer.state();
        let step = self
            .current_step()
            .map(|step| StepView::new(state.current_step_index, step));
        CircleVisuals::from_values(&self.values, step)
    }

    /// Apply a lifecycle event; returns true if the state changed
    fn apply(&mut self, event: Event) -> bool {
        let current = self.state.get();
        let next = current.transition(event);
        if next != current {
            debug!("exercise: {:?} -> {:?}", current, next);
            self.state.set(next);
            true
        } else {
            false
        }
    }
}

impl<S: SoundPlayer + 'static> Drop for Exercise<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Side effects of entering a step
fn step_start_handler<S: SoundPlayer + 'static>(
    steps: ActiveSteps,
    sound: Rc<RefCell<S>>,
    minimized: Animation,
    minimized_value: AnimatedValue,
) -> impl Fn(usize) + 'static {
    move |index| {
        let Some(step) = steps.get(index) else {
            return;
        };

        let cue = SoundCue::for_step(step.id);
        // Playback failures never hold up the sequence
        if let Err(e) = sound.borrow_mut().play(cue) {
            warn!("exercise: cue {:?} failed: {:?}", cue, e);
        }

        match MinimizedAction::for_step(step.id) {
            MinimizedAction::Start => {
                if !minimized.is_running() {
                    minimized.start(|_| {});
                }
            }
            MinimizedAction::Stop => {
                minimized.stop();
                minimized_value.set(0.0);
            }
            MinimizedAction::Keep => {}
        }
    }
}
