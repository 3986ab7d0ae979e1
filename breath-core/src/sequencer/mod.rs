//! Step sequencer
//!
//! Plays the active steps in an endless loop, one animation per step, and
//! announces each step before its animation begins.

pub mod executor;
pub mod step_track;

pub use executor::{SequencerError, SequencerPhase, SequencerState, StepSequencer};
pub use step_track::{fade_ms_for, step_animations, step_track, StepValues};
