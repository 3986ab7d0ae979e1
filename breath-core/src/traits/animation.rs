//! Animation driver trait

use crate::animation::CompletionCallback;

/// A startable, stoppable animation unit
///
/// Implementations must call `on_complete` at most once per `start`:
/// `finished: true` when the run reaches its end, `finished: false` when it
/// is stopped or superseded by another `start`. Platform animations whose
/// completions cannot be cancelled may still deliver a late callback; the
/// step sequencer guards against that with its own token.
pub trait AnimationDriver {
    /// Begin a run
    fn start(&self, on_complete: CompletionCallback);

    /// Interrupt the run in progress (no-op when idle)
    fn stop(&self);
}
