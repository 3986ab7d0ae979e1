//! Exercise orchestration
//!
//! Ties the step sequencer to its side effects: the entrance animation,
//! per-step sound cues, the minimized circle, elapsed-time tracking, and
//! teardown.

pub mod orchestrator;
pub mod visuals;

pub use orchestrator::{is_breathing_done, Exercise, ExerciseError, ExerciseValues, MinimizedAction};
pub use visuals::{CircleVisuals, StepView};
