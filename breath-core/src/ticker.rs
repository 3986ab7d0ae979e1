//! Fixed-period ticker with a replaceable callback
//!
//! The schedule and the callback are decoupled: the schedule is registered
//! once per period, while the callback lives in a cell that callers may
//! overwrite at any time (typically on every update cycle, with a closure
//! capturing fresher state). Each tick runs whatever callback is in the cell
//! at that moment.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use crate::clock::{Clock, TimerId};

/// Callback invoked on every tick
pub type TickCallback = Box<dyn FnMut()>;

/// Ticker errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickerError {
    /// A period of zero would tick forever without time advancing
    ZeroPeriod,
}

#[derive(Debug, Default)]
struct Schedule {
    /// Period of the active registration (None = stopped)
    period_ms: Option<u32>,
    /// Pending timer for the next tick
    timer: Option<TimerId>,
    /// Bumped on every (re)registration and stop
    generation: u64,
}

struct TickerShared {
    callback: RefCell<Option<TickCallback>>,
    schedule: RefCell<Schedule>,
}

impl TickerShared {
    fn fire(&self) {
        let Some(mut callback) = self.callback.borrow_mut().take() else {
            return;
        };

        callback();

        // A callback installed while this one ran takes precedence
        let mut slot = self.callback.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}

/// Repeating timer that always runs the latest callback
pub struct Ticker {
    clock: Clock,
    shared: Rc<TickerShared>,
}

impl Ticker {
    /// Create a stopped ticker on the given clock
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            shared: Rc::new(TickerShared {
                callback: RefCell::new(None),
                schedule: RefCell::new(Schedule::default()),
            }),
        }
    }

    /// Replace the callback without touching the schedule
    pub fn set_callback(&self, callback: impl FnMut() + 'static) {
        *self.shared.callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Install `callback` and tick every `period_ms`
    pub fn start_with(
        &self,
        callback: impl FnMut() + 'static,
        period_ms: u32,
    ) -> Result<(), TickerError> {
        self.set_callback(callback);
        self.start(period_ms)
    }

    /// Tick every `period_ms` with the current callback
    ///
    /// Restarting with the period already in effect keeps the existing
    /// registration, so tick timing is not reset.
    pub fn start(&self, period_ms: u32) -> Result<(), TickerError> {
        if period_ms == 0 {
            return Err(TickerError::ZeroPeriod);
        }

        if self.shared.schedule.borrow().period_ms == Some(period_ms) {
            return Ok(());
        }

        self.cancel_pending();
        let generation = {
            let mut schedule = self.shared.schedule.borrow_mut();
            schedule.generation += 1;
            schedule.period_ms = Some(period_ms);
            schedule.generation
        };

        debug!("ticker: registered every {} ms", period_ms);
        arm(Rc::downgrade(&self.shared), self.clock.clone(), period_ms, generation);
        Ok(())
    }

    /// Stop ticking
    ///
    /// Stopping an already stopped ticker is a no-op.
    pub fn stop(&self) {
        if self.shared.schedule.borrow().period_ms.is_none() {
            return;
        }

        self.cancel_pending();
        let mut schedule = self.shared.schedule.borrow_mut();
        schedule.generation += 1;
        schedule.period_ms = None;
        trace!("ticker: stopped");
    }

    /// Check if the ticker is running
    pub fn is_running(&self) -> bool {
        self.shared.schedule.borrow().period_ms.is_some()
    }

    /// Period of the active registration
    pub fn period_ms(&self) -> Option<u32> {
        self.shared.schedule.borrow().period_ms
    }

    fn cancel_pending(&self) {
        let timer = self.shared.schedule.borrow_mut().timer.take();
        if let Some(id) = timer {
            self.clock.clear_timeout(id);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Register the next tick for `generation`
///
/// The next tick is armed before the callback runs so a slow or
/// re-entrant callback cannot shift the period.
fn arm(shared: Weak<TickerShared>, clock: Clock, period_ms: u32, generation: u64) {
    let timer_clock = clock.clone();
    let timer_shared = shared.clone();

    let id = clock.set_timeout(period_ms, move || {
        let Some(shared) = timer_shared.upgrade() else {
            return;
        };
        if shared.schedule.borrow().generation != generation {
            return;
        }

        arm(Rc::downgrade(&shared), timer_clock, period_ms, generation);
        shared.fire();
    });

    if let Some(shared) = shared.upgrade() {
        shared.schedule.borrow_mut().timer = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::Cell;

    #[test]
    fn test_ticks_at_fixed_period() {
        let clock = Clock::new();
        let ticker = Ticker::new(clock.clone());
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        ticker.start_with(move || c.set(c.get() + 1), 100).unwrap();

        clock.advance(350);
        assert_eq!(count.get(), 3);
        assert!(ticker.is_running());
    }

    #[test]
    fn test_latest_callback_wins() {
        let clock = Clock::new();
        let ticker = Ticker::new(clock.clone());
        let calls = Rc::new(RefCell::new(Vec::new()));

        let a = calls.clone();
        ticker.start_with(move || a.borrow_mut().push('A'), 100).unwrap();

        clock.advance(50);

        // Replace before the first tick, same period
        let b = calls.clone();
        ticker.set_callback(move || b.borrow_mut().push('B'));
        ticker.start(100).unwrap();

        clock.advance(50);
        assert_eq!(*calls.borrow(), ['B']);

        clock.advance(100);
        assert_eq!(*calls.borrow(), ['B', 'B']);
    }

    #[test]
    fn test_same_period_keeps_timing() {
        let clock = Clock::new();
        let ticker = Ticker::new(clock.clone());
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        ticker.start_with(move || c.set(c.get() + 1), 100).unwrap();

        clock.advance(90);
        ticker.start(100).unwrap();
        clock.advance(10);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_period_change_reregisters() {
        let clock = Clock::new();
        let ticker = Ticker::new(clock.clone());
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        ticker.start_with(move || c.set(c.get() + 1), 100).unwrap();

        clock.advance(90);
        ticker.start(50).unwrap();
        clock.advance(10);
        assert_eq!(count.get(), 0);

        clock.advance(40);
        assert_eq!(count.get(), 1);
        assert_eq!(ticker.period_ms(), Some(50));
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let clock = Clock::new();
        let ticker = Ticker::new(clock.clone());
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        ticker.start_with(move || c.set(c.get() + 1), 100).unwrap();
        clock.advance(100);

        ticker.stop();
        ticker.stop();
        clock.advance(1000);

        assert_eq!(count.get(), 1);
        assert!(!ticker.is_running());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_callback_may_replace_itself() {
        let clock = Clock::new();
        let ticker = Rc::new(Ticker::new(clock.clone()));
        let calls = Rc::new(RefCell::new(Vec::new()));

        let t = Rc::downgrade(&ticker);
        let a = calls.clone();
        ticker
            .start_with(
                move || {
                    a.borrow_mut().push(1);
                    if let Some(t) = t.upgrade() {
                        let b = a.clone();
                        t.set_callback(move || b.borrow_mut().push(2));
                    }
                },
                10,
            )
            .unwrap();

        clock.advance(30);
        assert_eq!(*calls.borrow(), [1, 2, 2]);
    }

    #[test]
    fn test_zero_period_rejected() {
        let ticker = Ticker::new(Clock::new());
        assert_eq!(ticker.start_with(|| {}, 0), Err(TickerError::ZeroPeriod));
        assert!(!ticker.is_running());
    }
}
