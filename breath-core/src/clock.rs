//! Cooperative event loop with virtual time
//!
//! All timing in the engine goes through a [`Clock`]: one-shot timers are
//! registered with a delay and run when the clock is advanced past their due
//! time. Hosts advance the clock from their own frame or tick source; tests
//! advance it directly, which makes every scenario deterministic.
//!
//! Timers due at the same instant run in registration order. No internal
//! borrow is held while a timer callback runs, so callbacks may freely
//! register or clear timers.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::RefCell;

/// Identifier of a registered timer
pub type TimerId = u64;

type TimerCallback = Box<dyn FnOnce()>;

struct ClockInner {
    /// Current virtual time (ms)
    now_ms: u64,
    /// Next timer id to hand out
    next_id: TimerId,
    /// Pending timers keyed by (due time, id)
    timers: BTreeMap<(u64, TimerId), TimerCallback>,
}

/// Shared handle to the event loop
///
/// Cloning the handle shares the same timeline.
#[derive(Clone)]
pub struct Clock {
    inner: Rc<RefCell<ClockInner>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a clock starting at time zero
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockInner {
                now_ms: 0,
                next_id: 1,
                timers: BTreeMap::new(),
            })),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Run `callback` once, `delay_ms` from now
    pub fn set_timeout(&self, delay_ms: u32, callback: impl FnOnce() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now_ms + delay_ms as u64;
        inner.timers.insert((due, id), Box::new(callback));
        id
    }

    /// Cancel a pending timer
    ///
    /// Returns false if the timer already ran or was never registered.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.timers.len();
        inner.timers.retain(|&(_, timer_id), _| timer_id != id);
        inner.timers.len() != before
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due_ms(&self) -> Option<u64> {
        self.inner
            .borrow()
            .timers
            .keys()
            .next()
            .map(|&(due, _)| due)
    }

    /// Advance virtual time by `ms`, running every timer that falls due
    ///
    /// Time moves to each timer's due instant before it runs, so callbacks
    /// observe the time they were scheduled for. Timers registered by a
    /// callback run in the same call if they fall due within the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms() + ms;

        loop {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let next_due = inner.timers.keys().next().map(|&(due, _)| due);
                match next_due {
                    Some(due) if due <= target => {
                        inner.now_ms = due;
                        inner.timers.pop_first().map(|(_, cb)| cb)
                    }
                    _ => None,
                }
            };

            match callback {
                Some(cb) => cb(),
                None => break,
            }
        }

        self.inner.borrow_mut().now_ms = target;
    }
}
