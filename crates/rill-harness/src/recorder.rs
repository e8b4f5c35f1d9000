#![forbid(unsafe_code)]

//! Emission recording for assertions.

use std::cell::RefCell;
use std::rc::Rc;

use rill::{Observable, StreamError, Subscription};

/// One recorded event on a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission<T> {
    /// A value delivered to `on_next`.
    Next(T),
    /// The completion signal.
    Completed,
    /// A synchronous production failure routed to `on_error`.
    Error(StreamError),
}

/// Records every emission of a subscription in arrival order.
///
/// Cloning a `Recorder` shares the recording.
pub struct Recorder<T> {
    emissions: Rc<RefCell<Vec<Emission<T>>>>,
}

// Manual Clone: shares the recording.
impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            emissions: Rc::clone(&self.emissions),
        }
    }
}

impl<T> std::fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("emissions", &self.emissions.borrow().len())
            .finish()
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            emissions: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: 'static> Recorder<T> {
    /// Subscribe this recorder to `observable`. Returns the subscription
    /// handle, or `None` when production failed synchronously (the failure
    /// is recorded as [`Emission::Error`]).
    pub fn subscribe_to(&self, observable: &Observable<T>) -> Option<Subscription> {
        let next = Rc::clone(&self.emissions);
        let error = Rc::clone(&self.emissions);
        let complete = Rc::clone(&self.emissions);
        observable.subscribe_with(
            move |value| next.borrow_mut().push(Emission::Next(value)),
            move |err| error.borrow_mut().push(Emission::Error(err)),
            move || complete.borrow_mut().push(Emission::Completed),
        )
    }
}

impl<T: Clone> Recorder<T> {
    /// Everything recorded so far, in order.
    #[must_use]
    pub fn emissions(&self) -> Vec<Emission<T>> {
        self.emissions.borrow().clone()
    }

    /// Only the recorded values, in order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.emissions
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Emission::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many completion signals were recorded. A well-behaved stream
    /// records at most one.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.emissions
            .borrow()
            .iter()
            .filter(|e| matches!(e, Emission::Completed))
            .count()
    }

    /// True if any value was recorded after a completion signal — a
    /// violation of the engine's completion invariant.
    #[must_use]
    pub fn saw_next_after_completion(&self) -> bool {
        let emissions = self.emissions.borrow();
        let first_completion = emissions
            .iter()
            .position(|e| matches!(e, Emission::Completed));
        match first_completion {
            Some(index) => emissions[index + 1..]
                .iter()
                .any(|e| matches!(e, Emission::Next(_))),
            None => false,
        }
    }
}
