//! Easing curves
//!
//! All curves map progress in [0, 1] onto [0, 1] with fixed end points.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Easing curve applied to a timing's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant rate
    Linear,
    /// Slow start and end (cubic)
    #[default]
    EaseInOut,
    /// Fast start, slow end (quadratic)
    EaseOut,
}

impl Easing {
    /// Map linear progress `t` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}
