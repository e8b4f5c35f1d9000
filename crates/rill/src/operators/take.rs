#![forbid(unsafe_code)]

//! Prefix truncation.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscription::Teardown;

/// Forward the first `count` values, then complete exactly when the count
/// is reached. Later upstream values are ignored.
///
/// `take(0, ..)` completes immediately at subscribe time without touching
/// the source. If upstream completes before `count` values arrive, the
/// completion is forwarded (once).
#[must_use]
pub fn take<T: 'static>(count: usize, source: &Observable<T>) -> Observable<T> {
    let source = source.clone();
    Observable::create(move |observer| {
        if count == 0 {
            observer.complete();
            return Ok(Teardown::none());
        }
        let remaining = Rc::new(Cell::new(count));

        let on_next = {
            let remaining = Rc::clone(&remaining);
            let observer = observer.clone();
            move |value: T| {
                let left = remaining.get();
                if left == 0 {
                    return;
                }
                remaining.set(left - 1);
                observer.next(value);
                if left == 1 {
                    trace!(count, "take: reached count, completing");
                    observer.complete();
                }
            }
        };
        let on_complete = {
            let remaining = Rc::clone(&remaining);
            let observer = observer.clone();
            move || {
                // Upstream ran short; we have not completed yet.
                if remaining.get() > 0 {
                    remaining.set(0);
                    observer.complete();
                }
            }
        };

        let upstream = source.try_subscribe(Observer::new(on_next, on_complete))?;
        Ok(Teardown::new(move || upstream.dispose()))
    })
}
