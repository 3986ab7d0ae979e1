//! Events that trigger lifecycle transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Exercise screen shown
    Mount,
    /// Entrance animation ran to completion
    EntranceFinished,
    /// Exercise screen removed
    Unmount,
}
