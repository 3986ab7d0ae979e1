//! Visual properties derived from the animated values

use heapless::String;

use super::orchestrator::ExerciseValues;
use crate::animation::interpolate;
use crate::config::{Step, StepId, MAX_LABEL_LEN};

/// Circle scale with lungs empty
pub const CIRCLE_MIN_SCALE: f32 = 0.4;
/// Circle scale with lungs full
pub const CIRCLE_MAX_SCALE: f32 = 1.0;
/// Scale of the minimized circle at the bottom of its pulse
pub const MINIMIZED_MIN_SCALE: f32 = 0.6;
/// Scale the exercise enters from
pub const ENTRANCE_START_SCALE: f32 = 0.8;

/// Display metadata of the current step
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub index: usize,
    pub id: StepId,
    pub label: String<MAX_LABEL_LEN>,
    pub show_dots: bool,
}

impl StepView {
    pub(crate) fn new(index: usize, step: &Step) -> Self {
        Self {
            index,
            id: step.id,
            label: step.label.clone(),
            show_dots: step.show_dots,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct CircleVisuals {
    /// Breathing circle scale
    pub circle_scale: f32,
    /// Step label opacity
    pub label_opacity: f32,
    /// Minimized circle scale
    pub minimized_scale: f32,
    /// Whole-exercise opacity during the entrance
    pub entrance_opacity: f32,
    /// Whole-exercise scale during the entrance
    pub entrance_scale: f32,
    /// Step being played, if any
    pub step: Option<StepView>,
}

impl CircleVisuals {
    pub(crate) fn from_values(values: &ExerciseValues, step: Option<StepView>) -> Self {
        let entrance = values.entrance.get();
        Self {
            circle_scale: interpolate(
                values.circle.get(),
                (0.0, 1.0),
                (CIRCLE_MIN_SCALE, CIRCLE_MAX_SCALE),
            ),
            label_opacity: values.label.get(),
            minimized_scale: interpolate(
                values.minimized.get(),
                (0.0, 1.0),
                (1.0, MINIMIZED_MIN_SCALE),
            ),
            entrance_opacity: entrance,
            entrance_scale: interpolate(entrance, (0.0, 1.0), (ENTRANCE_START_SCALE, 1.0)),
            step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_visuals() {
        let values = ExerciseValues::new();
        let visuals = CircleVisuals::from_values(&values, None);
        assert_eq!(visuals.circle_scale, CIRCLE_MIN_SCALE);
        assert_eq!(visuals.label_opacity, 0.0);
        assert_eq!(visuals.minimized_scale, 1.0);
        assert_eq!(visuals.entrance_opacity, 0.0);
        assert_eq!(visuals.entrance_scale, ENTRANCE_START_SCALE);
    }

    #[test]
    fn test_full_circle() {
        let values = ExerciseValues::new();
        values.circle.set(1.0);
        values.entrance.set(1.0);
        values.minimized.set(1.0);
        let visuals = CircleVisuals::from_values(&values, None);
        assert_eq!(visuals.circle_scale, CIRCLE_MAX_SCALE);
        assert_eq!(visuals.entrance_scale, 1.0);
        assert_eq!(visuals.minimized_scale, MINIMIZED_MIN_SCALE);
    }
}
