use super::{Clock, Reference};
use crate::lib::*;

/// The default clock reference point in time: [`Instant`].
pub type DefaultReference = Instant;

/// The default clock that reports [`Instant`]s.
pub type DefaultClock = MonotonicClock;

/// The monotonic clock implemented by [`Instant`], sleeping with
/// [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Reference for Instant {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.saturating_duration_since(earlier)
    }
}

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}
