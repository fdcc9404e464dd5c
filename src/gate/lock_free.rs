use super::{decide, offset, Gate};
use crate::clock;
use crate::lib::*;
use crate::nanos::Nanos;
use std::sync::atomic::{AtomicU64, Ordering};

/// A gate that keeps its state in an atomic integer and updates it
/// with compare-and-swap.
///
/// Callers that find the next slot in the future read the state
/// without writing to it; only a caller that would be granted access
/// attempts an update.
///
/// # Example
/// ```
/// # use std::time::{Duration, Instant};
/// use interval_gate::{Gate, LockFreeGate};
///
/// let now = Instant::now();
/// let gate = LockFreeGate::construct(now);
/// let s = Duration::from_secs(1);
/// assert_eq!(Duration::new(0, 0), gate.try_take(now, s));
/// assert_eq!(s, gate.try_take(now, s));
/// assert_eq!(Duration::new(0, 0), gate.try_take(now + s, s));
/// ```
#[derive(Debug)]
pub struct LockFreeGate<P: clock::Reference = clock::DefaultReference> {
    start: P,

    // Nanoseconds from `start` until the next slot begins.
    next: AtomicU64,
}

impl<P: clock::Reference> Gate<P> for LockFreeGate<P> {
    fn construct(start: P) -> Self {
        LockFreeGate {
            start,
            next: AtomicU64::new(0),
        }
    }

    fn try_take(&self, now: P, interval: Duration) -> Duration {
        debug_assert!(interval > Duration::new(0, 0), "interval must be non-zero");
        let t0 = offset(self.start, now);
        let interval = Nanos::from(interval);
        let mut prev = self.next.load(Ordering::Acquire);
        // The state only ever changes when some caller is granted a
        // slot, so a failed exchange means either that another caller
        // made progress or that the weak exchange failed spuriously,
        // which deciding again absorbs. A single caller can still lose
        // indefinitely under pathological contention; that is as fair
        // as the atomic itself gets.
        loop {
            match decide(prev.into(), t0, interval) {
                Err(wait) => return wait.into(),
                Ok(new_next) => match self.next.compare_exchange_weak(
                    prev,
                    new_next.as_u64(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => return Duration::new(0, 0),
                    Err(observed) => prev = observed,
                },
            }
        }
    }

    fn next_permitted(&self) -> P {
        self.start + Duration::from_nanos(self.next.load(Ordering::Acquire))
    }
}
