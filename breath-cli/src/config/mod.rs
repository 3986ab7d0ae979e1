//! Session configuration
//!
//! Loads a session from a TOML file or the embedded default.

pub mod loader;

pub use loader::{load_session, min_elapsed_ms};
