use super::{decide, offset, Gate};
use crate::clock;
use crate::lib::*;
use crate::nanos::Nanos;
use parking_lot::Mutex;

/// A gate that keeps its state behind a mutex.
///
/// The mutex is held only while comparing and updating the next
/// slot's timestamp, never while a caller waits.
///
/// # Example
/// ```
/// # use std::time::{Duration, Instant};
/// use interval_gate::{Gate, LockingGate};
///
/// let now = Instant::now();
/// let gate = LockingGate::construct(now);
/// let s = Duration::from_secs(1);
/// assert_eq!(Duration::new(0, 0), gate.try_take(now, s));
/// assert_eq!(Duration::from_millis(600), gate.try_take(now + s * 4 / 10, s));
/// ```
#[derive(Debug)]
pub struct LockingGate<P: clock::Reference = clock::DefaultReference> {
    start: P,
    next: Mutex<Nanos>,
}

impl<P: clock::Reference> Gate<P> for LockingGate<P> {
    fn construct(start: P) -> Self {
        LockingGate {
            start,
            next: Mutex::new(Nanos::default()),
        }
    }

    fn try_take(&self, now: P, interval: Duration) -> Duration {
        debug_assert!(interval > Duration::new(0, 0), "interval must be non-zero");
        let t0 = offset(self.start, now);
        let mut next = self.next.lock();
        match decide(*next, t0, interval.into()) {
            Ok(new_next) => {
                *next = new_next;
                Duration::new(0, 0)
            }
            Err(wait) => wait.into(),
        }
    }

    fn next_permitted(&self) -> P {
        self.start + Duration::from(*self.next.lock())
    }
}
