//! Platform-agnostic core logic for guided breathing exercises
//!
//! This crate contains all application logic that does not depend on a
//! specific UI toolkit, audio backend or timer source:
//!
//! - Cooperative event loop with virtual time
//! - Fixed-period ticker with a replaceable callback
//! - Animated values and composable animation tracks
//! - Step sequencer looping over the active breathing steps
//! - Exercise orchestration (entrance, sound cues, teardown)
//! - Lifecycle state machine
//! - Configuration type definitions and breathing presets

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod animation;
pub mod clock;
pub mod config;
pub mod exercise;
pub mod sequencer;
pub mod state;
pub mod ticker;
pub mod traits;
