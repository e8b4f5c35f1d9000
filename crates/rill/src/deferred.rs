#![forbid(unsafe_code)]

//! Single-assignment cell with continuation registration.
//!
//! [`Deferred<T>`] is the engine's "pending single value" input: a shared
//! cell that is resolved at most once. Continuations registered before
//! resolution are queued and run, in registration order, when the value
//! arrives; continuations registered after resolution run immediately with
//! a clone of the value. Single-threaded; cloning a `Deferred` clones a
//! handle to the same cell.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StreamError;

struct DeferredInner<T> {
    value: Option<T>,
    continuations: Vec<Box<dyn FnOnce(T)>>,
}

/// A value that may not exist yet. Resolve it once; consume it through
/// [`Deferred::on_resolve`] or by feeding it to `from`.
pub struct Deferred<T> {
    inner: Rc<RefCell<DeferredInner<T>>>,
}

// Manual Clone: shares the same cell.
impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Deferred")
            .field("resolved", &inner.value.is_some())
            .field("pending_continuations", &inner.continuations.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Deferred<T> {
    /// Create an unresolved cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DeferredInner {
                value: None,
                continuations: Vec::new(),
            })),
        }
    }

    /// True once a value has been stored.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Store the value and run queued continuations in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyResolved`] on a second resolve; the
    /// original value is kept.
    pub fn resolve(&self, value: T) -> Result<(), StreamError> {
        // Take the queue out before running anything, so a continuation that
        // registers further continuations sees a resolved cell.
        let continuations = {
            let mut inner = self.inner.borrow_mut();
            if inner.value.is_some() {
                return Err(StreamError::AlreadyResolved);
            }
            inner.value = Some(value.clone());
            std::mem::take(&mut inner.continuations)
        };
        for continuation in continuations {
            continuation(value.clone());
        }
        Ok(())
    }

    /// Register a continuation. Runs immediately if already resolved.
    pub fn on_resolve(&self, continuation: impl FnOnce(T) + 'static) {
        let resolved = self.inner.borrow().value.clone();
        match resolved {
            Some(value) => continuation(value),
            None => self
                .inner
                .borrow_mut()
                .continuations
                .push(Box::new(continuation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn continuations_run_on_resolve_in_registration_order() {
        let deferred = Deferred::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        deferred.on_resolve(move |v: i32| log_a.borrow_mut().push(("a", v)));
        let log_b = Rc::clone(&log);
        deferred.on_resolve(move |v: i32| log_b.borrow_mut().push(("b", v)));

        assert!(log.borrow().is_empty());
        deferred.resolve(7).unwrap();
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn late_continuation_runs_immediately() {
        let deferred = Deferred::new();
        deferred.resolve(3).unwrap();

        let seen = Rc::new(Cell::new(0));
        let seen_c = Rc::clone(&seen);
        deferred.on_resolve(move |v| seen_c.set(v));
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn second_resolve_is_rejected() {
        let deferred = Deferred::new();
        deferred.resolve(1).unwrap();
        assert_eq!(deferred.resolve(2), Err(StreamError::AlreadyResolved));

        let seen = Rc::new(Cell::new(0));
        let seen_c = Rc::clone(&seen);
        deferred.on_resolve(move |v| seen_c.set(v));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn clone_shares_the_cell() {
        let a: Deferred<i32> = Deferred::new();
        let b = a.clone();
        a.resolve(5).unwrap();
        assert!(b.is_resolved());
    }
}
