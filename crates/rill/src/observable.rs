#![forbid(unsafe_code)]

//! The deferred computation at the center of the engine.
//!
//! # Design
//!
//! An [`Observable<T>`] wraps a *production function*: given an
//! [`Observer<T>`], it performs the production of values (synchronously or
//! over time) and returns a [`Teardown`]. Nothing runs until `subscribe`;
//! every `subscribe` call is an independent execution with its own
//! per-execution state, observer, and [`Subscription`]. Observables own none
//! of their subscribers and share no mutable state between executions.
//!
//! ## Invariants
//! 1. Production is lazy: the production function runs only inside a
//!    subscribe call.
//! 2. After a production invokes `on_complete` on an execution, it must not
//!    invoke `on_next` on that execution again. Operators enforce this with
//!    explicit active/stopped latches.
//! 3. A synchronous production failure is routed to `on_error` and no
//!    `Subscription` is returned: the caller must treat the missing handle
//!    as "never started".
//!
//! ## Failure Modes
//! - Errors raised inside deferred timer or event callbacks have no engine
//!   channel; they propagate to the host (see [`StreamError`] docs).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, trace};

use crate::error::StreamError;
use crate::observer::Observer;
use crate::subscription::{Subscription, Teardown};

type ProduceFn<T> = dyn Fn(Observer<T>) -> Result<Teardown, StreamError>;

/// A lazy, repeatable description of a value-producing computation.
///
/// Cloning an `Observable` clones a handle to the same production function;
/// it does not start anything.
pub struct Observable<T> {
    produce: Rc<ProduceFn<T>>,
}

// Manual Clone: shares the production function.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            produce: Rc::clone(&self.produce),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: 'static> Observable<T> {
    /// Wrap a production function.
    ///
    /// The production receives the effective observer for one execution and
    /// returns the teardown that releases whatever it acquired. Returning
    /// `Err` signals a synchronous failure; `subscribe_with` routes it to
    /// the caller's `on_error`.
    #[must_use]
    pub fn create(
        produce: impl Fn(Observer<T>) -> Result<Teardown, StreamError> + 'static,
    ) -> Self {
        Self {
            produce: Rc::new(produce),
        }
    }

    /// Run one execution against an already-built observer.
    ///
    /// Operators use this internally so a synchronous inner failure can
    /// surface through their own production's `Result`.
    pub(crate) fn try_subscribe(&self, observer: Observer<T>) -> Result<Subscription, StreamError> {
        (self.produce)(observer).map(Subscription::new)
    }

    /// Materialize one execution with a value callback only. Errors are
    /// discarded and completion is ignored.
    pub fn subscribe(&self, on_next: impl Fn(T) + 'static) -> Option<Subscription> {
        self.subscribe_with(on_next, |_| {}, || {})
    }

    /// Materialize one execution with value, error, and completion callbacks.
    ///
    /// Returns `None` when the production fails synchronously; the failure
    /// has already been handed to `on_error` and the execution never
    /// started.
    pub fn subscribe_with(
        &self,
        on_next: impl Fn(T) + 'static,
        on_error: impl FnOnce(StreamError),
        on_complete: impl Fn() + 'static,
    ) -> Option<Subscription> {
        match self.try_subscribe(Observer::new(on_next, on_complete)) {
            Ok(subscription) => {
                trace!("execution started");
                Some(subscription)
            }
            Err(err) => {
                debug!(error = %err, "production failed during subscribe");
                on_error(err);
                None
            }
        }
    }

    /// Return a new observable with a value transform fused in.
    ///
    /// The transform is fused via [`Observer::map`]: at subscribe time the
    /// subscriber's observer is routed through the transform before it
    /// reaches this observable's production, so `.map(f).map(g)` subscribed
    /// with `h` invokes `h(g(f(v)))` on each raw value `v`.
    #[must_use]
    pub fn map<U: 'static>(&self, transform: impl Fn(T) -> U + 'static) -> Observable<U> {
        let produce = Rc::clone(&self.produce);
        let transform = Rc::new(transform);
        Observable::create(move |observer: Observer<U>| {
            let transform = Rc::clone(&transform);
            produce(observer.map(move |value: T| transform(value)))
        })
    }

    /// Concatenate sources: each is subscribed only after the previous one
    /// completes, and the last source's completion completes the whole
    /// chain. Values and completion timing are otherwise forwarded
    /// unchanged.
    ///
    /// Disposing the returned subscription disposes whichever source is
    /// currently live. An empty source list completes immediately.
    #[must_use]
    pub fn concat(sources: Vec<Observable<T>>) -> Observable<T> {
        let sources = Rc::new(sources);
        Observable::create(move |observer| {
            if sources.is_empty() {
                observer.complete();
                return Ok(Teardown::none());
            }
            let active = Rc::new(RefCell::new(ActiveSlot {
                index: 0,
                subscription: None,
            }));
            activate(Rc::clone(&sources), 0, observer, Rc::clone(&active))?;
            Ok(Teardown::new(move || {
                if let Some(subscription) = active.borrow_mut().subscription.take() {
                    subscription.dispose();
                }
            }))
        })
    }
}

/// Tracks the live inner subscription of a concat chain. `index` records
/// which source the stored subscription belongs to, so a source that
/// completes synchronously during its own subscribe cannot clobber the
/// subscription of a later source.
struct ActiveSlot {
    index: usize,
    subscription: Option<Subscription>,
}

fn activate<T: 'static>(
    sources: Rc<Vec<Observable<T>>>,
    index: usize,
    observer: Observer<T>,
    active: Rc<RefCell<ActiveSlot>>,
) -> Result<(), StreamError> {
    let source = sources[index].clone();
    let is_last = index + 1 == sources.len();

    let forward = {
        let observer = observer.clone();
        move |value: T| observer.next(value)
    };
    let inner = if is_last {
        let observer = observer.clone();
        Observer::new(forward, move || observer.complete())
    } else {
        let next_sources = Rc::clone(&sources);
        let next_active = Rc::clone(&active);
        let observer = observer.clone();
        Observer::new(forward, move || {
            trace!(source = index + 1, "concat: activating next source");
            if let Err(err) = activate(
                Rc::clone(&next_sources),
                index + 1,
                observer.clone(),
                Rc::clone(&next_active),
            ) {
                // The outer production has already returned, so there is no
                // synchronous channel left; see StreamError docs.
                error!(error = %err, source = index + 1, "concat: failed to activate next source");
            }
        })
    };

    let subscription = source.try_subscribe(inner)?;
    let mut slot = active.borrow_mut();
    if slot.index <= index {
        slot.index = index;
        slot.subscription = Some(subscription);
    } else {
        // This source completed synchronously and a later source is already
        // live; this subscription is finished, release its teardown.
        subscription.dispose();
    }
    Ok(())
}
