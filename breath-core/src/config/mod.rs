//! Configuration types
//!
//! Step definitions, exercise session parameters and breathing presets.

pub mod presets;
pub mod types;

pub use presets::*;
pub use types::*;
