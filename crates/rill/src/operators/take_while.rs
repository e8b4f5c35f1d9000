#![forbid(unsafe_code)]

//! Predicate-gated prefix with a one-way latch.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscription::Teardown;

/// Forward values while `predicate` holds. The first failing value flips a
/// one-way latch: forwarding stops permanently for that execution and a
/// completion signal is fired. The failing value itself is not forwarded.
///
/// Upstream completion while still active completes the stream; upstream
/// completion after the latch is swallowed so completion fires exactly
/// once.
#[must_use]
pub fn take_while<T: 'static>(
    predicate: impl Fn(&T) -> bool + 'static,
    source: &Observable<T>,
) -> Observable<T> {
    let source = source.clone();
    let predicate = Rc::new(predicate);
    Observable::create(move |observer| {
        let active = Rc::new(Cell::new(true));

        let on_next = {
            let active = Rc::clone(&active);
            let predicate = Rc::clone(&predicate);
            let observer = observer.clone();
            move |value: T| {
                if !active.get() {
                    return;
                }
                if predicate(&value) {
                    observer.next(value);
                } else {
                    trace!("take_while: predicate failed, latching");
                    active.set(false);
                    observer.complete();
                }
            }
        };
        let on_complete = {
            let active = Rc::clone(&active);
            let observer = observer.clone();
            move || {
                if active.get() {
                    active.set(false);
                    observer.complete();
                }
            }
        };

        let upstream = source.try_subscribe(Observer::new(on_next, on_complete))?;
        Ok(Teardown::new(move || upstream.dispose()))
    })
}
