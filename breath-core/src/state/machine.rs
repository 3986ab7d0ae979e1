//! State machine definition

use super::events::Event;

/// Exercise lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Created, not yet shown
    #[default]
    Unmounted,
    /// Entrance animation playing
    Entering,
    /// Step sequence playing
    Breathing,
    /// Torn down; nothing may fire any more
    Closed,
}

impl State {
    /// Check if this state allows the step sequence to run
    pub fn sequence_allowed(&self) -> bool {
        matches!(self, State::Breathing)
    }

    /// Check if the exercise is on screen
    pub fn is_mounted(&self) -> bool {
        matches!(self, State::Entering | State::Breathing)
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Closed)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Unmounted, Mount) => Entering,
            (Entering, EntranceFinished) => Breathing,

            // Teardown from anywhere, including before mount
            (Unmounted | Entering | Breathing, Unmount) => Closed,

            // Default: stay in current state
            _ => self,
        }
    }
}
