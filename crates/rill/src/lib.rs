#![forbid(unsafe_code)]

//! rill: a push-based reactive stream engine.
//!
//! # Role
//! A lazy, composable abstraction for sequences of values delivered over
//! time: observables describe productions, operators transform and
//! time-shift them, subscriptions cancel them cooperatively.
//!
//! # Primary pieces
//! - **[`Observable`]**: a deferred production; nothing runs until
//!   `subscribe`, and every subscribe is an independent execution.
//! - **[`Observer`]** / **[`Subscription`]**: the consumer callbacks and
//!   the idempotent disposal handle.
//! - **Sources**: [`from`] adapts sequences and [`Deferred`] single
//!   values; [`from_event`] adapts anything implementing [`EventSource`].
//! - **Operators**: [`interval`], [`take`], [`take_while`], [`take_until`],
//!   [`take_last`], plus [`Observable::map`] and [`Observable::concat`].
//!
//! # Model
//! Single-threaded, cooperative, callback-driven. The engine never blocks
//! and never owns a clock: time-shifting consumes a host-supplied
//! [`TimerService`]. Cancellation is pull-only — disposal happens exactly
//! when the subscription holder calls [`Subscription::dispose`]; completion
//! and errors do not auto-dispose.
//!
//! ```
//! use rill::{from, Observable};
//!
//! let doubled = from(vec![1, 2, 3]).map(|v| v * 2);
//! let sub = doubled.subscribe(|v| println!("{v}"));
//! if let Some(sub) = sub {
//!     sub.dispose();
//! }
//! # let _ = Observable::concat(vec![from(vec![1]), from(vec![2])]);
//! ```

pub mod deferred;
pub mod error;
pub mod event;
pub mod observable;
pub mod observer;
pub mod operators;
pub mod source;
pub mod subscription;
pub mod timer;

pub use deferred::Deferred;
pub use error::StreamError;
pub use event::{EventEmitter, EventSource, ListenerId};
pub use observable::Observable;
pub use observer::Observer;
pub use operators::{interval, take, take_last, take_until, take_while};
pub use source::{Source, from, from_event};
pub use subscription::{Subscription, Teardown};
pub use timer::{TimerService, TimerToken};
