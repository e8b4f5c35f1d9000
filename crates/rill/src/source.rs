#![forbid(unsafe_code)]

//! Source constructors: adapting plain values into observables.
//!
//! # Design
//!
//! [`from`] accepts a [`Source<T>`], a tagged union of the two supported
//! input shapes: a finite ordered sequence or a single pending value. The
//! tag replaces runtime capability sniffing; `From` conversions keep call
//! sites terse (`from(vec![1, 2, 3])`, `from(deferred.clone())`).
//!
//! [`from_event`] adapts an [`EventSource`]: subscribing registers the
//! observer's value callback as a listener, disposing unregisters exactly
//! that listener. Event streams are unbounded and never complete.

use std::cell::Cell;
use std::rc::Rc;

use crate::deferred::Deferred;
use crate::event::EventSource;
use crate::observable::Observable;
use crate::subscription::Teardown;

/// The input shapes [`from`] accepts.
#[derive(Debug, Clone)]
pub enum Source<T> {
    /// A finite ordered sequence, replayed per subscription.
    Sequence(Vec<T>),
    /// A single value that may not have resolved yet.
    Deferred(Deferred<T>),
}

impl<T> From<Vec<T>> for Source<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Source<T> {
    fn from(values: [T; N]) -> Self {
        Self::Sequence(values.into())
    }
}

impl<T: Clone> From<&[T]> for Source<T> {
    fn from(values: &[T]) -> Self {
        Self::Sequence(values.to_vec())
    }
}

impl From<&str> for Source<char> {
    fn from(text: &str) -> Self {
        Self::Sequence(text.chars().collect())
    }
}

impl<T> From<Deferred<T>> for Source<T> {
    fn from(deferred: Deferred<T>) -> Self {
        Self::Deferred(deferred)
    }
}

impl<T> FromIterator<T> for Source<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}

/// Adapt a sequence or a deferred single value into an observable.
///
/// - Sequence: every element is pushed synchronously during subscribe, in
///   order, followed by exactly one completion.
/// - Deferred: when the cell resolves, the value is pushed and *then*
///   completion fires. Disposal before resolution suppresses both.
#[must_use]
pub fn from<T: Clone + 'static>(source: impl Into<Source<T>>) -> Observable<T> {
    match source.into() {
        Source::Sequence(values) => {
            let values = Rc::new(values);
            Observable::create(move |observer| {
                for value in values.iter() {
                    observer.next(value.clone());
                }
                observer.complete();
                Ok(Teardown::none())
            })
        }
        Source::Deferred(deferred) => Observable::create(move |observer| {
            let cancelled = Rc::new(Cell::new(false));
            let gate = Rc::clone(&cancelled);
            deferred.on_resolve(move |value| {
                if gate.get() {
                    return;
                }
                observer.next(value);
                observer.complete();
            });
            Ok(Teardown::new(move || cancelled.set(true)))
        }),
    }
}

/// Adapt a named event on an external source into an observable.
///
/// Each subscription registers its own listener; disposing removes it by
/// id. The stream never completes.
#[must_use]
pub fn from_event<E, S>(source: &S, event: &str) -> Observable<E>
where
    E: 'static,
    S: EventSource<E> + Clone + 'static,
{
    let source = source.clone();
    let event = event.to_string();
    Observable::create(move |observer| {
        let listener: Rc<dyn Fn(E)> = Rc::new(move |value| observer.next(value));
        let id = source.add_listener(&event, listener);
        let source = source.clone();
        let event = event.clone();
        Ok(Teardown::new(move || source.remove_listener(&event, id)))
    })
}
