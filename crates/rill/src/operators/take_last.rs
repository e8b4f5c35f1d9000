#![forbid(unsafe_code)]

//! Suffix replay on completion.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscription::Teardown;

/// Buffer every upstream value; on upstream completion, replay the last
/// `count` values (fewer if the stream was shorter) in their original
/// order, then complete.
///
/// Nothing is emitted before upstream completes, so this operator is only
/// useful on finite streams.
#[must_use]
pub fn take_last<T: 'static>(count: usize, source: &Observable<T>) -> Observable<T> {
    let source = source.clone();
    Observable::create(move |observer| {
        let buffer: Rc<RefCell<Vec<T>>> = Rc::new(RefCell::new(Vec::new()));

        let on_next = {
            let buffer = Rc::clone(&buffer);
            move |value: T| buffer.borrow_mut().push(value)
        };
        let on_complete = {
            let buffer = Rc::clone(&buffer);
            let observer = observer.clone();
            move || {
                let values = std::mem::take(&mut *buffer.borrow_mut());
                let start = values.len().saturating_sub(count);
                debug!(
                    buffered = values.len(),
                    replayed = values.len() - start,
                    "take_last: replaying suffix"
                );
                for value in values.into_iter().skip(start) {
                    observer.next(value);
                }
                observer.complete();
            }
        };

        let upstream = source.try_subscribe(Observer::new(on_next, on_complete))?;
        Ok(Teardown::new(move || upstream.dispose()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::from;

    /// Log values and completion into one ordered list.
    fn record(source: &Observable<i32>) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let next_log = Rc::clone(&log);
        let complete_log = Rc::clone(&log);
        source.subscribe_with(
            move |v| next_log.borrow_mut().push(format!("next:{v}")),
            |_| {},
            move || complete_log.borrow_mut().push("complete".to_string()),
        );
        log
    }

    #[test]
    fn replays_suffix_in_original_order_then_completes() {
        let log = record(&take_last(2, &from(vec![1, 2, 3, 4])));
        assert_eq!(*log.borrow(), ["next:3", "next:4", "complete"].map(String::from));
    }

    #[test]
    fn shorter_stream_replays_everything() {
        let log = record(&take_last(10, &from(vec![1, 2])));
        assert_eq!(*log.borrow(), ["next:1", "next:2", "complete"].map(String::from));
    }

    #[test]
    fn zero_emits_nothing_but_completes() {
        let log = record(&take_last(0, &from(vec![1, 2])));
        assert_eq!(*log.borrow(), ["complete"].map(String::from));
    }

    #[test]
    fn nothing_is_emitted_before_upstream_completes() {
        // A source that emits but never completes.
        let source: Observable<i32> = Observable::create(|observer| {
            observer.next(1);
            observer.next(2);
            Ok(Teardown::none())
        });

        let log = record(&take_last(1, &source));
        assert!(log.borrow().is_empty());
    }
}
