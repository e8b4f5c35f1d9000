#![forbid(unsafe_code)]

//! Stream consumer: a value callback paired with a completion callback.
//!
//! # Design
//!
//! [`Observer<T>`] is an immutable pair of reference-counted callbacks.
//! Cloning an observer is cheap (two `Rc` bumps) and both clones invoke the
//! same underlying closures. Observers are never mutated after construction;
//! [`Observer::map`] derives a *new* observer with a transform fused in front
//! of `on_next`.
//!
//! ## Composition order
//!
//! `observer.map(f)` runs `f` *before* the original `on_next`. Applied
//! left-to-right across an operator pipeline this makes the final subscriber
//! callback the outermost wrapper and the earliest `.map` the innermost
//! transform on raw source values: `.map(f).map(g)` subscribed with `h`
//! invokes `h(g(f(v)))`.

use std::rc::Rc;

/// A stream consumer: `on_next` receives values, `on_complete` is invoked
/// once when the producing execution finishes.
///
/// The error channel deliberately lives at the [`Observable`] layer (see
/// `Observable::subscribe_with`), not here.
///
/// [`Observable`]: crate::Observable
pub struct Observer<T> {
    on_next: Rc<dyn Fn(T)>,
    on_complete: Rc<dyn Fn()>,
}

// Manual Clone: shares the same callback Rcs.
impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            on_next: Rc::clone(&self.on_next),
            on_complete: Rc::clone(&self.on_complete),
        }
    }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}

impl<T: 'static> Observer<T> {
    /// Create an observer from a value callback and a completion callback.
    #[must_use]
    pub fn new(on_next: impl Fn(T) + 'static, on_complete: impl Fn() + 'static) -> Self {
        Self {
            on_next: Rc::new(on_next),
            on_complete: Rc::new(on_complete),
        }
    }

    /// Create an observer with only a value callback; completion is a no-op.
    #[must_use]
    pub fn with_next(on_next: impl Fn(T) + 'static) -> Self {
        Self::new(on_next, || {})
    }

    /// Create an observer that drops every value and ignores completion.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {}, || {})
    }

    /// Push a value into this observer.
    pub fn next(&self, value: T) {
        (self.on_next)(value);
    }

    /// Signal completion. A production must not call [`Observer::next`] on
    /// this execution after this.
    pub fn complete(&self) {
        (self.on_complete)();
    }

    /// Derive a new observer whose `on_next` runs `transform` before this
    /// observer's `on_next`. Completion is shared unchanged.
    ///
    /// This is the composition primitive behind `Observable::map`; operators
    /// use it to fuse transforms without re-wrapping productions by hand.
    #[must_use]
    pub fn map<S: 'static>(&self, transform: impl Fn(S) -> T + 'static) -> Observer<S> {
        let on_next = Rc::clone(&self.on_next);
        Observer {
            on_next: Rc::new(move |value: S| on_next(transform(value))),
            on_complete: Rc::clone(&self.on_complete),
        }
    }
}
