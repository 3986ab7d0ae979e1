//! Collaborator traits
//!
//! These traits define the interface between the exercise logic and the
//! platform pieces it drives: animation primitives and sound playback.

pub mod animation;
pub mod sound;

pub use animation::AnimationDriver;
pub use sound::{SoundCue, SoundError, SoundPlayer};
