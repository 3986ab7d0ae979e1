//! Per-step animation tracks
//!
//! Each step animates the breathing circle over its full duration while the
//! step label fades in at the start and out again at the end.

use alloc::vec;
use alloc::vec::Vec;

use crate::animation::{AnimatedValue, Animation, Easing, Track};
use crate::clock::Clock;
use crate::config::{ActiveSteps, AnimationTiming, Step, StepId};

/// Circle value with lungs full
pub const CIRCLE_FULL: f32 = 1.0;

/// Circle value with lungs empty
pub const CIRCLE_EMPTY: f32 = 0.0;

/// Values animated by the step tracks
#[derive(Debug, Clone)]
pub struct StepValues {
    /// Breathing circle progress
    pub circle: AnimatedValue,
    /// Step label opacity
    pub label: AnimatedValue,
}

/// Label fade duration that fits in a step
///
/// Fade in and fade out each take `fade_ms`; when the step is too short for
/// both, each is shortened to half the step.
pub fn fade_ms_for(step_ms: u32, fade_ms: u32) -> u32 {
    fade_ms.min(step_ms / 2)
}

/// Track for one step
pub fn step_track(step: &Step, values: &StepValues, label_fade_ms: u32) -> Track {
    let (target, easing) = match step.id {
        StepId::Inhale => (CIRCLE_FULL, Easing::EaseInOut),
        StepId::AfterInhale => (CIRCLE_FULL, Easing::Linear),
        StepId::Exhale => (CIRCLE_EMPTY, Easing::EaseInOut),
        StepId::AfterExhale => (CIRCLE_EMPTY, Easing::Linear),
    };

    let fade = fade_ms_for(step.duration_ms, label_fade_ms);
    let hold = step.duration_ms - 2 * fade;

    Track::Parallel(vec![
        Track::timing_with(&values.circle, target, step.duration_ms, easing),
        Track::Sequence(vec![
            Track::timing_with(&values.label, 1.0, fade, Easing::EaseOut),
            Track::Delay(hold),
            Track::timing_with(&values.label, 0.0, fade, Easing::Linear),
        ]),
    ])
}

/// One animation per active step
pub fn step_animations(
    clock: &Clock,
    steps: &ActiveSteps,
    values: &StepValues,
    timing: &AnimationTiming,
) -> Vec<Animation> {
    steps
        .iter()
        .map(|step| {
            Animation::new(clock, step_track(step, values, timing.label_fade_ms))
                .with_frame_ms(timing.frame_ms)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::value::CIRCLE_RANGE;

    fn values() -> StepValues {
        StepValues {
            circle: AnimatedValue::new(0.0, CIRCLE_RANGE),
            label: AnimatedValue::unit(0.0),
        }
    }

    #[test]
    fn test_fade_fits_step() {
        assert_eq!(fade_ms_for(4000, 400), 400);
        assert_eq!(fade_ms_for(500, 400), 250);
        assert_eq!(fade_ms_for(1, 400), 0);
    }

    #[test]
    fn test_track_lasts_exactly_one_step() {
        let v = values();
        for ms in [1, 300, 800, 4000] {
            let track = step_track(&Step::new(StepId::Exhale, ms), &v, 400);
            assert_eq!(track.duration_ms(), ms);
        }
    }

    #[test]
    fn test_inhale_fills_circle_and_pulses_label() {
        let clock = Clock::new();
        let v = values();
        let anim = Animation::new(&clock, step_track(&Step::new(StepId::Inhale, 1000), &v, 200))
            .with_frame_ms(10);

        anim.start(|_| {});
        clock.advance(500);
        assert_eq!(v.label.get(), 1.0);
        assert!(v.circle.get() > 0.0 && v.circle.get() < CIRCLE_FULL);

        clock.advance(500);
        assert_eq!(v.circle.get(), CIRCLE_FULL);
        assert_eq!(v.label.get(), 0.0);
    }
}
