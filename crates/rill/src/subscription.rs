#![forbid(unsafe_code)]

//! Disposal handles: [`Teardown`] actions and the [`Subscription`] guard.
//!
//! # Design
//!
//! Cancellation is pull-only: the holder of a [`Subscription`] decides when
//! production stops by calling [`Subscription::dispose`]. Nothing disposes
//! automatically — not completion, not errors, and not dropping the handle.
//! Operators that need downstream cleanup own their inner subscriptions and
//! dispose them from their own teardown.
//!
//! ## Invariants
//! 1. A teardown action runs at most once; `dispose()` is idempotent.
//! 2. Dropping a `Subscription` without calling `dispose()` leaves the
//!    execution running (no `Drop` impl).

use std::cell::{Cell, RefCell};

use tracing::trace;

/// What a production function returns: the action that releases whatever the
/// execution acquired (listeners, timers, inner subscriptions).
pub struct Teardown(Option<Box<dyn FnOnce()>>);

impl Teardown {
    /// A teardown with nothing to release.
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a release action.
    #[must_use]
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(action)))
    }

    fn into_action(self) -> Option<Box<dyn FnOnce()>> {
        self.0
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Teardown")
            .field(&self.0.as_ref().map(|_| "action"))
            .finish()
    }
}

/// Handle returned by a successful subscribe. Consumes a [`Teardown`];
/// [`Subscription::dispose`] runs it exactly once.
pub struct Subscription {
    disposed: Cell<bool>,
    teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    /// Wrap a teardown action in a disposal handle.
    #[must_use]
    pub fn new(teardown: Teardown) -> Self {
        Self {
            disposed: Cell::new(false),
            teardown: RefCell::new(teardown.into_action()),
        }
    }

    /// Stop the execution this handle belongs to. Idempotent: the wrapped
    /// teardown runs on the first call only.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(action) = self.teardown.borrow_mut().take() {
            action();
        }
        trace!("subscription disposed");
    }

    /// True once [`Subscription::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn dispose_runs_teardown_once() {
        let count = Rc::new(Cell::new(0u32));
        let count_c = Rc::clone(&count);

        let sub = Subscription::new(Teardown::new(move || count_c.set(count_c.get() + 1)));
        assert!(!sub.is_disposed());
        sub.dispose();
        assert_eq!(count.get(), 1);
        assert!(sub.is_disposed());

        sub.dispose();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn empty_teardown_disposes_cleanly() {
        let sub = Subscription::new(Teardown::none());
        sub.dispose();
        assert!(sub.is_disposed());
    }

    #[test]
    fn drop_does_not_run_teardown() {
        let count = Rc::new(Cell::new(0u32));
        let count_c = Rc::clone(&count);
        {
            let _sub = Subscription::new(Teardown::new(move || count_c.set(count_c.get() + 1)));
        }
        assert_eq!(count.get(), 0);
    }
}
