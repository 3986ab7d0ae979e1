//! Step sequencer execution
//!
//! Plays step animations back to back and wraps around forever. Every
//! start and stop issues a new token; completion callbacks are bound to the
//! token and step index they were started with, so a completion that
//! arrives after `stop()` (or after a restart) is ignored instead of
//! advancing the loop.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::animation::{Animation, AnimationResult};
use crate::config::{ActiveSteps, Step};
use crate::traits::AnimationDriver;

/// Sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerPhase {
    /// Created, never started
    Idle,
    /// Playing the step at this index
    Playing(usize),
    /// Stopped explicitly
    Stopped,
}

/// Snapshot of the sequencer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencerState {
    /// Index of the current (or last played) step
    pub current_step_index: usize,
    /// True while playing
    pub running: bool,
    /// Full cycles completed since the last start
    pub completed_cycles: u32,
}

/// Sequencer construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// Step and animation lists differ in length
    AnimationCountMismatch { steps: usize, animations: usize },
}

#[derive(Debug)]
struct Core {
    phase: SequencerPhase,
    token: u64,
    index: usize,
    cycles: u32,
}

struct Shared<A> {
    steps: ActiveSteps,
    animations: Vec<A>,
    on_step_start: Rc<dyn Fn(usize)>,
    core: RefCell<Core>,
}

/// Endless step loop
///
/// Clones share the same sequencer.
pub struct StepSequencer<A: AnimationDriver + 'static = Animation> {
    shared: Rc<Shared<A>>,
}

impl<A: AnimationDriver + 'static> Clone for StepSequencer<A> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<A: AnimationDriver + 'static> StepSequencer<A> {
    /// Create an idle sequencer
    ///
    /// `animations[i]` plays step `i`. `on_step_start(i)` runs before step
    /// `i`'s animation starts; it may call `stop()` or `start()`.
    pub fn new(
        steps: ActiveSteps,
        animations: Vec<A>,
        on_step_start: impl Fn(usize) + 'static,
    ) -> Result<Self, SequencerError> {
        if steps.len() != animations.len() {
            return Err(SequencerError::AnimationCountMismatch {
                steps: steps.len(),
                animations: animations.len(),
            });
        }

        Ok(Self {
            shared: Rc::new(Shared {
                steps,
                animations,
                on_step_start: Rc::new(on_step_start),
                core: RefCell::new(Core {
                    phase: SequencerPhase::Idle,
                    token: 0,
                    index: 0,
                    cycles: 0,
                }),
            }),
        })
    }

    /// Start playing from the first step
    ///
    /// No-op while already playing. After `stop()` this restarts at step 0.
    pub fn start(&self) {
        let token = {
            let mut core = self.shared.core.borrow_mut();
            if let SequencerPhase::Playing(_) = core.phase {
                return;
            }
            core.token += 1;
            core.cycles = 0;
            core.token
        };

        info!("sequencer: start ({} steps)", self.shared.steps.len());
        enter(&self.shared, 0, token);
    }

    /// Stop playing
    ///
    /// Interrupts the step in flight; its completion, even if delivered
    /// late, no longer advances the loop. No-op unless playing.
    pub fn stop(&self) {
        let in_flight = {
            let mut core = self.shared.core.borrow_mut();
            let SequencerPhase::Playing(index) = core.phase else {
                return;
            };
            core.token += 1;
            core.phase = SequencerPhase::Stopped;
            index
        };

        info!("sequencer: stop at step {}", in_flight);
        self.shared.animations[in_flight].stop();
    }

    /// Current phase
    pub fn phase(&self) -> SequencerPhase {
        self.shared.core.borrow().phase
    }

    /// Position snapshot
    pub fn state(&self) -> SequencerState {
        let core = self.shared.core.borrow();
        SequencerState {
            current_step_index: core.index,
            running: matches!(core.phase, SequencerPhase::Playing(_)),
            completed_cycles: core.cycles,
        }
    }

    /// Step being played
    pub fn current_step(&self) -> Option<&Step> {
        match self.phase() {
            SequencerPhase::Playing(index) => self.shared.steps.get(index),
            _ => None,
        }
    }

    /// Steps this sequencer loops over
    pub fn steps(&self) -> &ActiveSteps {
        &self.shared.steps
    }
}

/// Enter step `index` under `token`: announce it, then start its animation
fn enter<A: AnimationDriver + 'static>(shared: &Rc<Shared<A>>, index: usize, token: u64) {
    {
        let mut core = shared.core.borrow_mut();
        if core.token != token {
            return;
        }
        core.phase = SequencerPhase::Playing(index);
        core.index = index;
    }

    trace!("sequencer: step {}", index);
    let on_step_start = shared.on_step_start.clone();
    on_step_start(index);

    // The callback may have stopped or restarted the loop
    if shared.core.borrow().token != token {
        return;
    }

    let weak = Rc::downgrade(shared);
    shared.animations[index].start(alloc::boxed::Box::new(move |result: AnimationResult| {
        if !result.finished {
            return;
        }
        if let Some(shared) = weak.upgrade() {
            advance(&shared, index, token);
        }
    }));
}

/// Move past step `index` if its completion is still current
fn advance<A: AnimationDriver + 'static>(shared: &Rc<Shared<A>>, index: usize, token: u64) {
    let next = {
        let mut core = shared.core.borrow_mut();
        if core.token != token || core.phase != SequencerPhase::Playing(index) {
            debug!("sequencer: stale completion for step {} ignored", index);
            return;
        }
        let next = (index + 1) % shared.animations.len();
        if next == 0 {
            core.cycles += 1;
        }
        next
    };

    enter(shared, next, token);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::CompletionCallback;
    use crate::config::StepId;
    use alloc::vec;
    use core::cell::Cell;
    use proptest::prelude::*;

    /// Animation completed by hand
    ///
    /// With `cancellable == false`, `stop()` does not drop the pending
    /// callback, mimicking platform animations whose completions cannot be
    /// revoked.
    #[derive(Clone)]
    struct ManualAnimation {
        index: usize,
        log: Rc<RefCell<Vec<Entry>>>,
        pending: Rc<RefCell<Option<CompletionCallback>>>,
        cancellable: bool,
        stops: Rc<Cell<u32>>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Entry {
        StepStart(usize),
        AnimationStart(usize),
    }

    impl AnimationDriver for ManualAnimation {
        fn start(&self, on_complete: CompletionCallback) {
            self.log.borrow_mut().push(Entry::AnimationStart(self.index));
            let previous = self.pending.borrow_mut().replace(on_complete);
            if let Some(previous) = previous {
                previous(AnimationResult::INTERRUPTED);
            }
        }

        fn stop(&self) {
            self.stops.set(self.stops.get() + 1);
            if !self.cancellable {
                return;
            }
            let pending = self.pending.borrow_mut().take();
            if let Some(cb) = pending {
                cb(AnimationResult::INTERRUPTED);
            }
        }
    }

    impl ManualAnimation {
        fn complete(&self) -> bool {
            let pending = self.pending.borrow_mut().take();
            match pending {
                Some(cb) => {
                    cb(AnimationResult::FINISHED);
                    true
                }
                None => false,
            }
        }
    }

    struct Harness {
        sequencer: StepSequencer<ManualAnimation>,
        animations: Vec<ManualAnimation>,
        log: Rc<RefCell<Vec<Entry>>>,
    }

    impl Harness {
        fn new(n: usize, cancellable: bool) -> Self {
            let ids = [StepId::Inhale, StepId::AfterInhale, StepId::Exhale, StepId::AfterExhale];
            let steps: Vec<Step> = (0..n)
                .map(|i| Step::new(ids[i % 4], 1000 + i as u32))
                .collect();
            let steps = ActiveSteps::from_steps(&steps).unwrap();

            let log = Rc::new(RefCell::new(Vec::new()));
            let animations: Vec<ManualAnimation> = (0..n)
                .map(|index| ManualAnimation {
                    index,
                    log: log.clone(),
                    pending: Rc::new(RefCell::new(None)),
                    cancellable,
                    stops: Rc::new(Cell::new(0)),
                })
                .collect();

            let l = log.clone();
            let sequencer = StepSequencer::new(steps, animations.clone(), move |i| {
                l.borrow_mut().push(Entry::StepStart(i))
            })
            .unwrap();

            Self {
                sequencer,
                animations,
                log,
            }
        }

        /// Complete whichever animation is current
        fn finish_current(&self) {
            let index = self.sequencer.state().current_step_index;
            assert!(self.animations[index].complete());
        }

        fn step_starts(&self) -> Vec<usize> {
            self.log
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Entry::StepStart(i) => Some(*i),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn test_idle_until_started() {
        let h = Harness::new(3, true);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert!(h.log.borrow().is_empty());
        assert!(h.sequencer.current_step().is_none());
    }

    #[test]
    fn test_loops_in_order() {
        let h = Harness::new(3, true);
        h.sequencer.start();
        for _ in 0..6 {
            h.finish_current();
        }

        assert_eq!(h.step_starts(), [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(h.sequencer.state().completed_cycles, 2);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Playing(0));
    }

    #[test]
    fn test_step_start_precedes_animation() {
        let h = Harness::new(2, true);
        h.sequencer.start();
        h.finish_current();
        h.finish_current();

        assert_eq!(
            *h.log.borrow(),
            [
                Entry::StepStart(0),
                Entry::AnimationStart(0),
                Entry::StepStart(1),
                Entry::AnimationStart(1),
                Entry::StepStart(0),
                Entry::AnimationStart(0),
            ]
        );
    }

    #[test]
    fn test_single_step_loops_on_itself() {
        let h = Harness::new(1, true);
        h.sequencer.start();
        h.finish_current();
        h.finish_current();
        assert_eq!(h.step_starts(), [0, 0, 0]);
        assert_eq!(h.sequencer.state().completed_cycles, 2);
    }

    #[test]
    fn test_stop_interrupts_animation() {
        let h = Harness::new(3, true);
        h.sequencer.start();
        h.finish_current();

        h.sequencer.stop();
        assert_eq!(h.sequencer.phase(), SequencerPhase::Stopped);
        assert_eq!(h.animations[1].stops.get(), 1);
        assert!(!h.sequencer.state().running);

        // Nothing left to complete
        assert!(!h.animations[1].complete());
        assert_eq!(h.step_starts(), [0, 1]);
    }

    #[test]
    fn test_late_completion_after_stop_is_ignored() {
        let h = Harness::new(3, false);
        h.sequencer.start();
        h.sequencer.stop();
        h.sequencer.stop();

        // The platform delivers the completion anyway
        assert!(h.animations[0].complete());
        assert_eq!(h.step_starts(), [0]);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Stopped);
    }

    #[test]
    fn test_late_completion_after_restart_is_ignored() {
        let h = Harness::new(3, false);
        h.sequencer.start();
        let stale = h.animations[0].pending.borrow_mut().take().unwrap();

        h.sequencer.stop();
        h.sequencer.start();
        assert_eq!(h.step_starts(), [0, 0]);

        stale(AnimationResult::FINISHED);
        assert_eq!(h.step_starts(), [0, 0]);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Playing(0));

        h.finish_current();
        assert_eq!(h.step_starts(), [0, 0, 1]);
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let h = Harness::new(2, true);
        h.sequencer.start();
        h.sequencer.start();
        assert_eq!(h.step_starts(), [0]);
    }

    #[test]
    fn test_stop_from_step_callback() {
        let steps = ActiveSteps::from_steps(&[
            Step::new(StepId::Inhale, 1000),
            Step::new(StepId::Exhale, 1000),
        ])
        .unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let animations: Vec<ManualAnimation> = (0..2)
            .map(|index| ManualAnimation {
                index,
                log: log.clone(),
                pending: Rc::new(RefCell::new(None)),
                cancellable: true,
                stops: Rc::new(Cell::new(0)),
            })
            .collect();

        let slot: Rc<RefCell<Option<StepSequencer<ManualAnimation>>>> =
            Rc::new(RefCell::new(None));
        let s = slot.clone();
        let sequencer = StepSequencer::new(steps, animations.clone(), move |i| {
            if i == 1 {
                if let Some(seq) = s.borrow().as_ref() {
                    seq.stop();
                }
            }
        })
        .unwrap();
        *slot.borrow_mut() = Some(sequencer.clone());

        sequencer.start();
        assert!(animations[0].complete());

        // Step 1 was announced but its animation never started
        assert_eq!(sequencer.phase(), SequencerPhase::Stopped);
        assert_eq!(
            *log.borrow(),
            [Entry::AnimationStart(0)]
        );

        slot.borrow_mut().take();
    }

    #[test]
    fn test_animation_count_mismatch() {
        let steps = ActiveSteps::from_steps(&[Step::new(StepId::Inhale, 1000)]).unwrap();
        let result = StepSequencer::<Animation>::new(steps, vec![], |_| {});
        assert!(matches!(
            result,
            Err(SequencerError::AnimationCountMismatch {
                steps: 1,
                animations: 0
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_every_index_once_in_order(n in 1usize..=8, rounds in 0usize..40) {
            let h = Harness::new(n, true);
            h.sequencer.start();
            for _ in 0..rounds {
                h.finish_current();
            }

            let expected: Vec<usize> = (0..=rounds).map(|k| k % n).collect();
            prop_assert_eq!(h.step_starts(), expected);
            prop_assert_eq!(h.sequencer.state().completed_cycles as usize, rounds / n);
        }

        #[test]
        fn prop_no_step_start_after_stop(
            n in 1usize..=8,
            before in 0usize..20,
            cancellable in any::<bool>(),
        ) {
            let h = Harness::new(n, cancellable);
            h.sequencer.start();
            for _ in 0..before {
                h.finish_current();
            }
            let announced = h.step_starts().len();

            h.sequencer.stop();
            for anim in &h.animations {
                anim.complete();
            }

            prop_assert_eq!(h.step_starts().len(), announced);
            prop_assert_eq!(h.sequencer.phase(), SequencerPhase::Stopped);
        }
    }
}
