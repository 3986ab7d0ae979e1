//! Exercise lifecycle state machine
//!
//! The lifecycle is explicit, finite, and deterministic. The orchestrator
//! starts the step sequence only once the entrance has moved it to
//! `Breathing`, and releases sound playback only on the first teardown.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
