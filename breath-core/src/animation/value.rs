//! Bounded animated scalar

use alloc::rc::Rc;
use core::cell::Cell;

/// Range of a value that scales the breathing circle
pub const CIRCLE_RANGE: (f32, f32) = (0.0, 1.3);

/// Range of an opacity or progress value
pub const UNIT_RANGE: (f32, f32) = (0.0, 1.0);

/// Mutable scalar animated between two bounds
///
/// Clones share the same underlying value: the owner keeps one handle and
/// hands clones to the tracks that animate it. Writes are clamped to the
/// range.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    cell: Rc<Cell<f32>>,
    min: f32,
    max: f32,
}

impl AnimatedValue {
    /// Create a value in `range`, starting at `initial`
    pub fn new(initial: f32, range: (f32, f32)) -> Self {
        let (min, max) = range;
        debug_assert!(min <= max);
        Self {
            cell: Rc::new(Cell::new(initial.clamp(min, max))),
            min,
            max,
        }
    }

    /// Create a value in [0, 1]
    pub fn unit(initial: f32) -> Self {
        Self::new(initial, UNIT_RANGE)
    }

    /// Current value
    pub fn get(&self) -> f32 {
        self.cell.get()
    }

    /// Set the value, clamped to the range
    pub fn set(&self, value: f32) {
        self.cell.set(value.clamp(self.min, self.max));
    }

    /// Check if two handles refer to the same value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}
