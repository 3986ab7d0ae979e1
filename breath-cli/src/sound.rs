//! Terminal sound cues
//!
//! Stands in for audio playback: each cue is announced on stderr, with an
//! optional terminal bell.

use std::io::Write;

use log::trace;

use breath_core::traits::{SoundCue, SoundError, SoundPlayer};

/// Sound player that writes cues to the terminal
#[derive(Debug, Default)]
pub struct TerminalSound {
    bell: bool,
    muted: bool,
    played: u32,
}

impl TerminalSound {
    pub fn new(bell: bool) -> Self {
        Self {
            bell,
            muted: false,
            played: 0,
        }
    }

    /// Player that accepts cues without output
    pub fn muted() -> Self {
        Self {
            muted: true,
            ..Self::default()
        }
    }
}

impl SoundPlayer for TerminalSound {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        self.played += 1;
        trace!("Cue {}", cue.cue_id());
        if self.muted {
            return Ok(());
        }

        let mut err = std::io::stderr().lock();
        let bell = if self.bell { "\x07" } else { "" };
        writeln!(err, "{}~ {}", bell, cue.cue_id()).map_err(|_| SoundError::Unavailable)
    }

    fn stop_all(&mut self) {
        trace!("Cues stopped after {}", self.played);
    }
}
