//! Breathing patterns
//!
//! A pattern is four phase durations. It expands into the full four-step
//! list; a hold of zero becomes a skipped step rather than disappearing, so
//! step order is always inhale, hold, exhale, hold.

use heapless::Vec;

use super::types::{Step, StepId, MAX_STEPS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase durations of one breathing cycle (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreathingPattern {
    pub inhale_ms: u32,
    pub after_inhale_ms: u32,
    pub exhale_ms: u32,
    pub after_exhale_ms: u32,
}

impl BreathingPattern {
    /// Box breathing, 4-4-4-4
    pub const BOX: Self = Self::new(4000, 4000, 4000, 4000);
    /// 4-7-8 relaxing breath
    pub const RELAXING: Self = Self::new(4000, 7000, 8000, 0);
    /// Long exhale, 4-0-6-0
    pub const CALM: Self = Self::new(4000, 0, 6000, 0);
    /// Coherent breathing, 5.5 breaths per minute
    pub const COHERENT: Self = Self::new(5500, 0, 5500, 0);

    /// Named presets
    pub const PRESETS: [(&'static str, Self); 4] = [
        ("box", Self::BOX),
        ("relaxing", Self::RELAXING),
        ("calm", Self::CALM),
        ("coherent", Self::COHERENT),
    ];

    pub const fn new(inhale_ms: u32, after_inhale_ms: u32, exhale_ms: u32, after_exhale_ms: u32) -> Self {
        Self {
            inhale_ms,
            after_inhale_ms,
            exhale_ms,
            after_exhale_ms,
        }
    }

    /// Look up a preset by name
    pub fn by_name(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, p)| *p)
    }

    /// Expand into the four-step list
    pub fn steps(&self) -> Vec<Step, MAX_STEPS> {
        let mut steps = Vec::new();
        for (id, duration_ms) in [
            (StepId::Inhale, self.inhale_ms),
            (StepId::AfterInhale, self.after_inhale_ms),
            (StepId::Exhale, self.exhale_ms),
            (StepId::AfterExhale, self.after_exhale_ms),
        ] {
            let mut step = Step::new(id, duration_ms);
            step.skipped = duration_ms == 0;
            // MAX_STEPS is larger than four
            let _ = steps.push(step);
        }
        steps
    }

    /// Duration of one cycle (ms)
    pub fn cycle_ms(&self) -> u64 {
        self.inhale_ms as u64
            + self.after_inhale_ms as u64
            + self.exhale_ms as u64
            + self.after_exhale_ms as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActiveSteps;

    #[test]
    fn test_box_has_four_active_steps() {
        let steps = BreathingPattern::BOX.steps();
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| !s.skipped));
    }

    #[test]
    fn test_zero_holds_are_skipped() {
        let steps = BreathingPattern::CALM.steps();
        assert_eq!(steps.len(), 4);
        assert!(steps[1].skipped);
        assert!(steps[3].skipped);

        let active = ActiveSteps::from_steps(&steps).unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active.cycle_ms(), BreathingPattern::CALM.cycle_ms());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(BreathingPattern::by_name("Relaxing"), Some(BreathingPattern::RELAXING));
        assert_eq!(BreathingPattern::by_name("unknown"), None);
    }
}
