//! A wall-clock convenience wrapper over [`Matcher::find_cancellable`]'s
//! cooperative cancellation handle.
//!
//! [`Matcher::find_cancellable`]: crate::Matcher::find_cancellable

use std::time::{Duration, Instant};

/// Polls as expired once `duration` has elapsed since construction.
///
/// Grounded on the `Instant`-based timing idiom `internal/parser.rs` already
/// uses for compile-time tracing; this just exposes that primitive as a
/// cancellation source for [`Matcher::find_cancellable`].
///
/// [`Matcher::find_cancellable`]: crate::Matcher::find_cancellable
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// A deadline `duration` from now.
    pub fn after(duration: Duration) -> Self {
        Deadline {
            expires_at: Instant::now() + duration,
        }
    }

    /// True once the deadline has passed.
    pub fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// A closure suitable for [`Matcher::find_cancellable`]'s `cancel` argument.
    ///
    /// [`Matcher::find_cancellable`]: crate::Matcher::find_cancellable
    pub fn as_cancel_fn(&self) -> impl FnMut() -> bool + '_ {
        move || self.expired()
    }
}
