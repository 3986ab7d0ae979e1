//! Sound cue playback trait

use crate::config::StepId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Audio cue played when a step starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SoundCue {
    Inhale,
    Hold,
    Exhale,
}

impl SoundCue {
    /// Cue for the step being entered
    pub fn for_step(id: StepId) -> Self {
        match id {
            StepId::Inhale => SoundCue::Inhale,
            StepId::AfterInhale | StepId::AfterExhale => SoundCue::Hold,
            StepId::Exhale => SoundCue::Exhale,
        }
    }

    /// Asset identifier of the cue
    pub fn cue_id(&self) -> &'static str {
        match self {
            SoundCue::Inhale => "inhale",
            SoundCue::Hold => "hold",
            SoundCue::Exhale => "exhale",
        }
    }
}

/// Errors that can occur during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundError {
    /// Asset not loaded or unknown
    NotLoaded,
    /// Backend failed to play the cue
    Playback,
    /// Audio output unavailable (muted, interrupted, no device)
    Unavailable,
}

/// Fire-and-forget sound playback
///
/// Playback must not block. Errors are reported so the caller can log
/// them; they never affect sequencing.
pub trait SoundPlayer {
    /// Play a cue
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError>;

    /// Silence anything still playing
    fn stop_all(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_for_step() {
        assert_eq!(SoundCue::for_step(StepId::Inhale), SoundCue::Inhale);
        assert_eq!(SoundCue::for_step(StepId::AfterInhale), SoundCue::Hold);
        assert_eq!(SoundCue::for_step(StepId::Exhale), SoundCue::Exhale);
        assert_eq!(SoundCue::for_step(StepId::AfterExhale), SoundCue::Hold);
        assert_eq!(SoundCue::Hold.cue_id(), "hold");
    }
}
