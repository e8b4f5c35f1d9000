#![forbid(unsafe_code)]

//! Cumulative time-shifted re-emission.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscription::Teardown;
use crate::timer::{TimerService, TimerToken};

/// Re-emit each upstream value after a cumulative delay: the k-th value
/// received is scheduled `k * delay` after it arrives relative to
/// subscription start, so emissions pace out at `delay`, `2 * delay`, ...
///
/// Values are buffered in arrival order (FIFO) and drained one per timer
/// firing. Upstream completion is recorded and the outer completion fires
/// once the buffer has drained; if upstream completes with nothing
/// buffered, completion fires immediately.
///
/// Disposal tears down the upstream subscription and cancels every armed
/// timer, so nothing fires after dispose.
#[must_use]
pub fn interval<T: 'static>(
    delay: Duration,
    timers: &Rc<dyn TimerService>,
    source: &Observable<T>,
) -> Observable<T> {
    let timers = Rc::clone(timers);
    let source = source.clone();
    Observable::create(move |observer| {
        let queue: Rc<RefCell<VecDeque<T>>> = Rc::new(RefCell::new(VecDeque::new()));
        let upstream_done = Rc::new(Cell::new(false));
        let next_delay = Rc::new(Cell::new(delay));
        let tokens: Rc<RefCell<Vec<TimerToken>>> = Rc::new(RefCell::new(Vec::new()));

        let on_next = {
            let queue = Rc::clone(&queue);
            let upstream_done = Rc::clone(&upstream_done);
            let next_delay = Rc::clone(&next_delay);
            let tokens = Rc::clone(&tokens);
            let timers = Rc::clone(&timers);
            let observer = observer.clone();
            move |value: T| {
                queue.borrow_mut().push_back(value);
                let fire = {
                    let queue = Rc::clone(&queue);
                    let upstream_done = Rc::clone(&upstream_done);
                    let observer = observer.clone();
                    move || {
                        let value = queue.borrow_mut().pop_front();
                        if let Some(value) = value {
                            observer.next(value);
                        }
                        if upstream_done.get() && queue.borrow().is_empty() {
                            debug!("interval: buffer drained, completing");
                            observer.complete();
                        }
                    }
                };
                let token = timers.schedule(next_delay.get(), Box::new(fire));
                tokens.borrow_mut().push(token);
                next_delay.set(next_delay.get() + delay);
            }
        };

        let on_complete = {
            let queue = Rc::clone(&queue);
            let upstream_done = Rc::clone(&upstream_done);
            let observer = observer.clone();
            move || {
                upstream_done.set(true);
                if queue.borrow().is_empty() {
                    observer.complete();
                }
            }
        };

        let upstream = source.try_subscribe(Observer::new(on_next, on_complete))?;
        let timers = Rc::clone(&timers);
        Ok(Teardown::new(move || {
            upstream.dispose();
            let armed = tokens.borrow_mut().split_off(0);
            trace!(cancelled = armed.len(), "interval: cancelling armed timers");
            for token in armed {
                timers.cancel(token);
            }
        }))
    })
}
// Timing behavior is covered in tests/interval_pacing.rs, which drives a
// deterministic manual clock.
