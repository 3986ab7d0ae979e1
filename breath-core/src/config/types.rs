//! Configuration type definitions
//!
//! These types describe one exercise session: the ordered breathing steps,
//! the animation timing, and the thresholds reported on close.

use heapless::{String, Vec};

use super::presets::BreathingPattern;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 24;

/// Maximum steps per exercise
pub const MAX_STEPS: usize = 8;

/// Breathing phase of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepId {
    #[default]
    Inhale,
    /// Hold with full lungs
    AfterInhale,
    Exhale,
    /// Hold with empty lungs
    AfterExhale,
}

impl StepId {
    /// Check if this is a hold phase
    pub fn is_hold(&self) -> bool {
        matches!(self, StepId::AfterInhale | StepId::AfterExhale)
    }

    /// Default display label
    pub fn default_label(&self) -> &'static str {
        match self {
            StepId::Inhale => "Breathe in",
            StepId::AfterInhale | StepId::AfterExhale => "Hold",
            StepId::Exhale => "Breathe out",
        }
    }
}

/// One phase of a breathing cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Step {
    /// Breathing phase
    pub id: StepId,
    /// Duration in milliseconds
    pub duration_ms: u32,
    /// Excluded from the played sequence
    pub skipped: bool,
    /// Show the progress dots while this step plays
    pub show_dots: bool,
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
}

impl Step {
    /// Create a step with the default label for its phase
    pub fn new(id: StepId, duration_ms: u32) -> Self {
        let mut label = String::new();
        // Default labels are shorter than MAX_LABEL_LEN
        let _ = label.push_str(id.default_label());
        Self {
            id,
            duration_ms,
            skipped: false,
            show_dots: id.is_hold(),
            label,
        }
    }

    /// Mark the step as skipped
    pub fn skipped(mut self) -> Self {
        self.skipped = true;
        self
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::new(StepId::Inhale, 4000)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Every step is skipped (or the list is empty)
    NoActiveSteps,
    /// An active step has zero duration
    ZeroDuration(StepId),
    /// More than [`MAX_STEPS`] steps
    TooManySteps,
    /// Label longer than [`MAX_LABEL_LEN`]
    LabelTooLong,
}

/// The steps actually played, in order
///
/// Guaranteed non-empty, with every step lasting at least 1 ms.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveSteps {
    steps: Vec<Step, MAX_STEPS>,
}

impl ActiveSteps {
    /// Drop skipped steps and validate the rest
    pub fn from_steps(steps: &[Step]) -> Result<Self, ConfigError> {
        let mut active = Vec::new();
        for step in steps.iter().filter(|s| !s.skipped) {
            if step.duration_ms == 0 {
                return Err(ConfigError::ZeroDuration(step.id));
            }
            active
                .push(step.clone())
                .map_err(|_| ConfigError::TooManySteps)?;
        }

        if active.is_empty() {
            return Err(ConfigError::NoActiveSteps);
        }

        Ok(Self { steps: active })
    }

    /// Number of active steps (at least one)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Iterate over the active steps
    pub fn iter(&self) -> core::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Duration of one full cycle (ms)
    pub fn cycle_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ms as u64).sum()
    }
}

/// Animation timing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationTiming {
    /// Animation frame interval (ms)
    pub frame_ms: u32,
    /// Entrance fade/scale-in duration (ms)
    pub entrance_ms: u32,
    /// Step label fade in / fade out duration, each (ms)
    pub label_fade_ms: u32,
    /// One grow-and-shrink pulse of the minimized circle (ms)
    pub minimized_pulse_ms: u32,
    /// Elapsed-time tick period (ms)
    pub elapsed_tick_ms: u32,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            entrance_ms: 500,
            label_fade_ms: 400,
            minimized_pulse_ms: 2000,
            elapsed_tick_ms: 1000,
        }
    }
}

/// Exercise session parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExerciseConfig {
    /// Ordered steps, skipped ones included
    pub steps: Vec<Step, MAX_STEPS>,
    /// Haptic feedback on step change (not acted on yet)
    pub vibration_enabled: bool,
    /// Minimum session length for the exercise to count as done (ms)
    pub min_elapsed_ms: u64,
    /// Animation timing
    pub timing: AnimationTiming,
}

impl ExerciseConfig {
    /// Session running the given pattern with default settings
    pub fn from_pattern(pattern: &BreathingPattern) -> Self {
        Self {
            steps: pattern.steps(),
            ..Default::default()
        }
    }

    /// Validate the steps and derive the played sequence
    pub fn active_steps(&self) -> Result<ActiveSteps, ConfigError> {
        ActiveSteps::from_steps(&self.steps)
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            steps: BreathingPattern::BOX.steps(),
            vibration_enabled: false,
            min_elapsed_ms: 60_000,
            timing: AnimationTiming::default(),
        }
    }
}

/// Build a label, rejecting overlong text
pub fn make_label(text: &str) -> Result<String<MAX_LABEL_LEN>, ConfigError> {
    String::try_from(text).map_err(|_| ConfigError::LabelTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_fit() {
        for id in [
            StepId::Inhale,
            StepId::AfterInhale,
            StepId::Exhale,
            StepId::AfterExhale,
        ] {
            let step = Step::new(id, 1000);
            assert_eq!(step.label.as_str(), id.default_label());
        }
    }

    #[test]
    fn test_skipped_steps_filtered() {
        let steps = [
            Step::new(StepId::Inhale, 4000),
            Step::new(StepId::AfterInhale, 0).skipped(),
            Step::new(StepId::Exhale, 6000),
            Step::new(StepId::AfterExhale, 2000).skipped(),
        ];

        let active = ActiveSteps::from_steps(&steps).unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active.get(0).unwrap().id, StepId::Inhale);
        assert_eq!(active.get(1).unwrap().id, StepId::Exhale);
        assert_eq!(active.cycle_ms(), 10_000);
    }

    #[test]
    fn test_all_skipped_rejected() {
        let steps = [
            Step::new(StepId::Inhale, 4000).skipped(),
            Step::new(StepId::Exhale, 4000).skipped(),
        ];
        assert_eq!(
            ActiveSteps::from_steps(&steps),
            Err(ConfigError::NoActiveSteps)
        );
        assert_eq!(ActiveSteps::from_steps(&[]), Err(ConfigError::NoActiveSteps));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let steps = [
            Step::new(StepId::Inhale, 4000),
            Step::new(StepId::Exhale, 0),
        ];
        assert_eq!(
            ActiveSteps::from_steps(&steps),
            Err(ConfigError::ZeroDuration(StepId::Exhale))
        );
    }

    #[test]
    fn test_too_many_steps() {
        let steps = [
            Step::new(StepId::Inhale, 1000),
            Step::new(StepId::Exhale, 1000),
        ];
        let many: heapless::Vec<Step, 16> = steps.iter().cycle().take(9).cloned().collect();
        assert_eq!(
            ActiveSteps::from_steps(&many),
            Err(ConfigError::TooManySteps)
        );
    }

    #[test]
    fn test_default_labels_and_dots() {
        let hold = Step::new(StepId::AfterExhale, 1000);
        assert_eq!(hold.label.as_str(), "Hold");
        assert!(hold.show_dots);
        assert!(!Step::new(StepId::Exhale, 1000).show_dots);
    }

    #[test]
    fn test_label_length() {
        assert!(make_label("Breathe in slowly").is_ok());
        assert_eq!(
            make_label("This label is much too long to display"),
            Err(ConfigError::LabelTooLong)
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ExerciseConfig::default();
        let active = config.active_steps().unwrap();
        assert_eq!(active.len(), 4);
        assert_eq!(config.timing.frame_ms, 16);
    }
}
