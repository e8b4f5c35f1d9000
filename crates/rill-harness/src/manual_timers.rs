#![forbid(unsafe_code)]

//! A `TimerService` on a manual clock.
//!
//! Time only moves when a test calls [`ManualTimers::advance`]. Due
//! callbacks fire in due-time order, first-scheduled first among ties, and
//! callbacks may schedule further timers while the clock is advancing —
//! anything that lands inside the advanced window fires in the same call.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rill::{TimerService, TimerToken};

struct ScheduledTimer {
    token: TimerToken,
    due: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

struct TimersInner {
    now: Duration,
    next_token: u64,
    next_seq: u64,
    pending: Vec<ScheduledTimer>,
}

/// Deterministic manual-clock timer service. Cloning shares the clock and
/// the pending set.
pub struct ManualTimers {
    inner: Rc<RefCell<TimersInner>>,
}

// Manual Clone: shares the clock.
impl Clone for ManualTimers {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ManualTimers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualTimers")
            .field("now", &inner.now)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl Default for ManualTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimers {
    /// Create a clock at time zero with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimersInner {
                now: Duration::ZERO,
                next_token: 0,
                next_seq: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// This clock as the trait object the engine's operators consume.
    #[must_use]
    pub fn service(&self) -> Rc<dyn TimerService> {
        Rc::new(self.clone())
    }

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of callbacks still scheduled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Move the clock forward by `delta`, firing every callback that comes
    /// due, in due-time order (first-scheduled first among ties). Callbacks
    /// run outside the internal borrow, so they may schedule or cancel
    /// timers; newly scheduled callbacks due within the window fire too.
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.borrow().now + delta;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due_index = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(index, _)| index);
                match due_index {
                    Some(index) => {
                        let timer = inner.pending.remove(index);
                        inner.now = inner.now.max(timer.due);
                        Some(timer)
                    }
                    None => None,
                }
            };
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

impl TimerService for ManualTimers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken {
        let mut inner = self.inner.borrow_mut();
        let token = TimerToken::new(inner.next_token);
        inner.next_token += 1;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let due = inner.now + delay;
        inner.pending.push(ScheduledTimer {
            token,
            due,
            seq,
            callback,
        });
        token
    }

    fn cancel(&self, token: TimerToken) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|timer| timer.token != token);
    }
}
