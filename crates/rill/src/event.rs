#![forbid(unsafe_code)]

//! External event sources.
//!
//! The engine adapts event streams through the [`EventSource`] capability:
//! anything that can register and unregister a named-event listener. Hosts
//! bridge their own emitters by implementing the trait; [`EventEmitter`] is
//! the bundled single-threaded implementation, used by the tests and usable
//! directly.
//!
//! Listener identity is by [`ListenerId`], not callback pointer, so removal
//! is exact even when the same closure shape is registered twice.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identifies one registered listener on one event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Build an id from a raw value. Implementations of [`EventSource`]
    /// decide what the value means.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Capability to register and unregister listeners for named events.
///
/// `remove_listener` with an unknown id is a no-op.
pub trait EventSource<E> {
    /// Register a listener for `event`; returns its id.
    fn add_listener(&self, event: &str, listener: Rc<dyn Fn(E)>) -> ListenerId;
    /// Unregister the listener previously returned for `event`.
    fn remove_listener(&self, event: &str, id: ListenerId);
}

struct EmitterInner<E> {
    next_id: u64,
    listeners: HashMap<String, Vec<(ListenerId, Rc<dyn Fn(E)>)>>,
}

/// Single-threaded event emitter: a listener map keyed by event name.
///
/// Cloning an `EventEmitter` clones a handle to the same listener table.
/// Listeners fire in registration order; each receives a clone of the
/// emitted value.
pub struct EventEmitter<E> {
    inner: Rc<RefCell<EmitterInner<E>>>,
}

// Manual Clone: shares the listener table.
impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.inner.borrow().listeners.len())
            .finish()
    }
}

impl<E: Clone + 'static> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + 'static> EventEmitter<E> {
    /// Create an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Deliver `value` to every listener registered for `event`, in
    /// registration order.
    pub fn emit(&self, event: &str, value: E) {
        // Collect first so listeners can add/remove listeners re-entrantly.
        let listeners: Vec<Rc<dyn Fn(E)>> = self
            .inner
            .borrow()
            .listeners
            .get(event)
            .map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(value.clone());
        }
    }

    /// Number of listeners currently registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl<E: Clone + 'static> EventSource<E> for EventEmitter<E> {
    fn add_listener(&self, event: &str, listener: Rc<dyn Fn(E)>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId::new(inner.next_id);
        inner.next_id += 1;
        inner
            .listeners
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn remove_listener(&self, event: &str, id: ListenerId) {
        if let Some(entries) = self.inner.borrow_mut().listeners.get_mut(event) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }
}
