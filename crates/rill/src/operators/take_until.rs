#![forbid(unsafe_code)]

//! Forwarding gated by a second stream.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscription::{Subscription, Teardown};

/// Forward values from `source` until `notifier` emits its first value,
/// at which point the stream completes and both inner subscriptions are
/// disposed. A notifier that never emits makes this operator transparent.
///
/// The notifier is subscribed first, so a notifier that fires synchronously
/// during subscribe suppresses the source entirely.
#[must_use]
pub fn take_until<T: 'static, N: 'static>(
    notifier: &Observable<N>,
    source: &Observable<T>,
) -> Observable<T> {
    let notifier = notifier.clone();
    let source = source.clone();
    Observable::create(move |observer| {
        let active = Rc::new(Cell::new(true));
        let notifier_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let source_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let notifier_observer = {
            let active = Rc::clone(&active);
            let notifier_sub = Rc::clone(&notifier_sub);
            let source_sub = Rc::clone(&source_sub);
            let observer = observer.clone();
            Observer::with_next(move |_value: N| {
                if !active.get() {
                    return;
                }
                trace!("take_until: notifier fired, completing");
                active.set(false);
                observer.complete();
                if let Some(sub) = notifier_sub.borrow_mut().take() {
                    sub.dispose();
                }
                if let Some(sub) = source_sub.borrow_mut().take() {
                    sub.dispose();
                }
            })
        };

        let notifier_subscription = notifier.try_subscribe(notifier_observer)?;
        if !active.get() {
            // Notifier fired synchronously during its own subscribe.
            notifier_subscription.dispose();
            return Ok(Teardown::none());
        }
        *notifier_sub.borrow_mut() = Some(notifier_subscription);

        let on_next = {
            let active = Rc::clone(&active);
            let observer = observer.clone();
            move |value: T| {
                if active.get() {
                    observer.next(value);
                }
            }
        };
        let on_complete = {
            let active = Rc::clone(&active);
            let notifier_sub = Rc::clone(&notifier_sub);
            let observer = observer.clone();
            move || {
                if active.get() {
                    active.set(false);
                    observer.complete();
                    if let Some(sub) = notifier_sub.borrow_mut().take() {
                        sub.dispose();
                    }
                }
            }
        };

        let source_subscription = match source.try_subscribe(Observer::new(on_next, on_complete)) {
            Ok(subscription) => subscription,
            Err(err) => {
                if let Some(sub) = notifier_sub.borrow_mut().take() {
                    sub.dispose();
                }
                return Err(err);
            }
        };
        *source_sub.borrow_mut() = Some(source_subscription);

        Ok(Teardown::new(move || {
            if let Some(sub) = source_sub.borrow_mut().take() {
                sub.dispose();
            }
            if let Some(sub) = notifier_sub.borrow_mut().take() {
                sub.dispose();
            }
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventEmitter;
    use crate::source::{from, from_event};

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
    fn silent_notifier_is_transparent() {
        let emitter: EventEmitter<()> = EventEmitter::new();
        let notifier = from_event(&emitter, "stop");

        let log = record(&take_until(&notifier, &from(vec![1, 2, 3])));
        assert_eq!(
            *log.borrow(),
            ["next:1", "next:2", "next:3", "complete"].map(String::from)
        );
    }

    #[test]
    fn notifier_emission_completes_and_suppresses_later_values() {
        let stop: EventEmitter<()> = EventEmitter::new();
        let values: EventEmitter<i32> = EventEmitter::new();
        let gated = take_until(&from_event(&stop, "stop"), &from_event(&values, "v"));

        let log = record(&gated);

        values.emit("v", 1);
        stop.emit("stop", ());
        values.emit("v", 2);

        assert_eq!(*log.borrow(), ["next:1", "complete"].map(String::from));
    }

    #[test]
    fn notifier_fire_disposes_both_inner_subscriptions() {
        let stop: EventEmitter<()> = EventEmitter::new();
        let values: EventEmitter<i32> = EventEmitter::new();
        let gated = take_until(&from_event(&stop, "stop"), &from_event(&values, "v"));

        let _sub = gated.subscribe(|_| {});
        assert_eq!(stop.listener_count("stop"), 1);
        assert_eq!(values.listener_count("v"), 1);

        stop.emit("stop", ());
        assert_eq!(stop.listener_count("stop"), 0);
        assert_eq!(values.listener_count("v"), 0);
    }

    #[test]
    fn synchronously_firing_notifier_suppresses_the_source_entirely() {
        let started = Rc::new(Cell::new(false));
        let started_c = Rc::clone(&started);
        let source: Observable<i32> = Observable::create(move |observer| {
            started_c.set(true);
            observer.next(1);
            observer.complete();
            Ok(Teardown::none())
        });

        let log = record(&take_until(&from(vec![()]), &source));
        assert_eq!(*log.borrow(), ["complete"].map(String::from));
        assert!(!started.get());
    }

    #[test]
    fn dispose_removes_both_listeners() {
        let stop: EventEmitter<()> = EventEmitter::new();
        let values: EventEmitter<i32> = EventEmitter::new();
        let gated = take_until(&from_event(&stop, "stop"), &from_event(&values, "v"));

        let sub = gated.subscribe(|_| {}).unwrap();
        sub.dispose();
        assert_eq!(stop.listener_count("stop"), 0);
        assert_eq!(values.listener_count("v"), 0);
    }
}
