#![forbid(unsafe_code)]

//! Errors surfaced by the engine.

/// Errors from stream construction and production.
///
/// A synchronous production failure is surfaced exactly once, via the
/// `on_error` callback passed to `Observable::subscribe_with`; no
/// `Subscription` is returned in that case. Failures raised later, inside
/// timer or event callbacks, have no engine-level channel and propagate to
/// the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// A production function failed during its synchronous run.
    Production(String),
    /// `Deferred::resolve` was called on an already-resolved cell.
    AlreadyResolved,
}

impl StreamError {
    /// Convenience constructor for production failures.
    #[must_use]
    pub fn production(message: impl Into<String>) -> Self {
        Self::Production(message.into())
    }
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production(msg) => write!(f, "production failed: {msg}"),
            Self::AlreadyResolved => write!(f, "deferred value already resolved"),
        }
    }
}

impl std::error::Error for StreamError {}
