//! Gates: the decision whether a caller may proceed.
//!
//! A gate keeps a single timestamp, the earliest instant at which the
//! next caller may proceed. Asking the gate at an instant `now`
//! either grants access (and atomically moves that timestamp to
//! `now + interval`) or returns how long the caller still has to
//! wait. Gates never block; waiting is up to the caller.

mod lock_free;
mod locking;

pub use self::lock_free::*;
pub use self::locking::*;

use crate::clock;
use crate::lib::*;
use crate::nanos::Nanos;

/// The default gate strategy of this crate: the
/// [`LockFreeGate`](struct.LockFreeGate.html).
pub type DefaultGate = LockFreeGate;

/// The trait that gate strategies implement.
///
/// All strategies must be indistinguishable for callers: for the same
/// sequence of `try_take` calls they make the same decisions, and
/// when several threads ask at once, exactly one of them is granted
/// each slot.
pub trait Gate<P: clock::Reference = clock::DefaultReference>:
    Send + Sync + Sized + fmt::Debug
{
    /// Constructs a gate whose first slot is free from `start` on.
    ///
    /// All instants passed to the gate later are measured relative
    /// to `start`; instants before it count as `start`.
    fn construct(start: P) -> Self;

    /// Asks for access at the instant `now`.
    ///
    /// Returns the zero duration if access was granted; the next slot
    /// then begins `interval` after `now`. Otherwise, returns the
    /// time left until the next slot begins, and doesn't change the
    /// gate's state.
    ///
    /// `interval` must be non-zero; a zero interval would grant
    /// every caller. [`ResourceLimiter`](../limiter/struct.ResourceLimiter.html)
    /// rejects it at construction.
    fn try_take(&self, now: P, interval: Duration) -> Duration;

    /// Returns the earliest instant at which the next caller may
    /// proceed.
    ///
    /// # Thread safety
    /// This is a snapshot of state that other threads may change at
    /// any time; relying on it *will* race.
    fn next_permitted(&self) -> P;
}

/// Decides on a caller arriving at `t0`, if the next slot begins at
/// `next`: `Ok` holds the beginning of the slot after the granted
/// one, `Err` the time left to wait.
fn decide(next: Nanos, t0: Nanos, interval: Nanos) -> Result<Nanos, Nanos> {
    if t0 < next {
        Err(next.saturating_sub(t0))
    } else {
        Ok(t0 + interval)
    }
}

/// The offset of `now` from `start`, in a representation that fits an atomic.
fn offset<P: clock::Reference>(start: P, now: P) -> Nanos {
    now.duration_since(start).into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decide_grants_at_and_after_the_slot() {
        let s = Nanos::from(1_000u64);
        let next = Nanos::from(5_000u64);
        assert_eq!(Ok(Nanos::from(6_000u64)), decide(next, next, s));
        assert_eq!(Ok(Nanos::from(8_000u64)), decide(next, Nanos::from(7_000u64), s));
    }

    #[test]
    fn decide_reports_remaining_wait() {
        let s = Nanos::from(1_000u64);
        let next = Nanos::from(5_000u64);
        assert_eq!(Err(Nanos::from(4_000u64)), decide(next, Nanos::from(1_000u64), s));
    }
}
