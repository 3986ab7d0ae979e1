//! Animated values and the animation runner
//!
//! An [`Animation`] drives a [`Track`] (timings, delays, sequences and
//! parallel groups over [`AnimatedValue`]s) on a [`Clock`](crate::clock::Clock),
//! frame by frame, and reports completion with an [`AnimationResult`].

pub mod easing;
pub mod interpolate;
pub mod runner;
pub mod track;
pub mod value;

pub use easing::Easing;
pub use interpolate::interpolate;
pub use runner::{Animation, AnimationResult, CompletionCallback, DEFAULT_FRAME_MS};
pub use track::Track;
pub use value::AnimatedValue;
