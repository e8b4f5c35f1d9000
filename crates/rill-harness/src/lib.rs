#![forbid(unsafe_code)]

//! Deterministic test fixtures for the rill engine.
//!
//! - [`ManualTimers`]: a `TimerService` driven by an explicit `advance`
//!   call instead of a wall clock, so timer-dependent operator tests are
//!   deterministic and instant.
//! - [`Recorder`]: collects a subscription's emissions for assertions.

pub mod manual_timers;
pub mod recorder;

pub use manual_timers::ManualTimers;
pub use recorder::{Emission, Recorder};
