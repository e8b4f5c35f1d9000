#![forbid(unsafe_code)]

//! Time and sequence operators.
//!
//! Every operator takes its source(s) by reference, captures cheap clones,
//! and returns a new lazy [`Observable`]. All operator state (buffers,
//! counters, latches) is created inside the production function, so each
//! subscription gets its own independent execution. Latching operators
//! model their gate as an explicit active/stopped flag and fire completion
//! at most once.
//!
//! [`Observable`]: crate::Observable

mod interval;
mod take;
mod take_last;
mod take_until;
mod take_while;

pub use interval::interval;
pub use take::take;
pub use take_last::take_last;
pub use take_until::take_until;
pub use take_while::take_while;
