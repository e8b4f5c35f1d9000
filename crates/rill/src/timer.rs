#![forbid(unsafe_code)]

//! The abstract timer capability.
//!
//! The engine never owns a clock: time-shifting operators consume a
//! [`TimerService`] supplied by the host's event loop. The engine itself
//! never blocks; "after `delay`" means whenever the host fires the
//! callback. `rill-harness` ships a deterministic manual-clock
//! implementation for tests.

use std::time::Duration;

/// Identifies one scheduled callback for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Build a token from a raw value. Implementations of [`TimerService`]
    /// decide what the value means.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Capability to invoke a callback after a delay.
///
/// `cancel` must be a no-op for tokens that already fired or were never
/// issued — disposal paths cancel every token they ever armed without
/// tracking which ones are still pending.
pub trait TimerService {
    /// Schedule `callback` to run once, `delay` from now.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken;
    /// Cancel a scheduled callback if it has not fired yet.
    fn cancel(&self, token: TimerToken);
}
