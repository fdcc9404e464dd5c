//! Time sources for the limiter.
//!
//! A limiter never reads the system time or sleeps by itself: it asks
//! a [`Clock`] for both. This allows swapping the real clock for a
//! [`MockClock`] in tests, where the passage of time (and the threads
//! waiting for it) is under the control of the test.

use crate::lib::*;

/// A measurement from a clock.
pub trait Reference:
    Sized
    + Sub<Duration, Output = Self>
    + Add<Duration, Output = Self>
    + PartialEq
    + Eq
    + Ord
    + Copy
    + Clone
    + Send
    + Sync
    + Debug
{
    /// Determines the time that separates two measurements of a
    /// clock. Returns the zero duration if `earlier` is actually
    /// later than `self`.
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A time source used by limiters.
///
/// Clocks are cheap handles: clones of a clock observe the same time.
pub trait Clock: Default + Clone + Send + Sync {
    /// A measurement of a monotonically increasing clock.
    type Instant: Reference;

    /// Returns a measurement of the clock.
    fn now(&self) -> Self::Instant;

    /// Blocks the calling thread until at least `duration` has
    /// passed on this clock.
    fn sleep(&self, duration: Duration);
}

impl Reference for Duration {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.checked_sub(earlier).unwrap_or_default()
    }
}

mod mock;
pub use self::mock::*;

mod with_std;
pub use self::with_std::*;
