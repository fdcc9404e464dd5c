//! A limiter that lets callers wait for access to a shared resource.

use crate::lib::*;
use crate::{
    clock::{self, Clock},
    gate::{DefaultGate, Gate},
    InvalidInterval,
};
use tracing::trace;

/// Grants access to a shared resource at most once per interval.
///
/// Callers ask for access with [`take`](#method.take), passing the
/// longest time they are willing to wait. The limiter can be cloned
/// cheaply; all clones share the same gate and clock, so handing a
/// clone to each thread serializes all of them.
///
/// Which gate strategy and clock a limiter uses is determined by its
/// type parameters; use [`build_with_interval`](#method.build_with_interval)
/// to choose a clock instance other than the default.
#[derive(Debug)]
pub struct ResourceLimiter<G = DefaultGate, C = clock::DefaultClock>
where
    C: Clock,
    G: Gate<C::Instant>,
{
    interval: Duration,
    gate: Arc<G>,
    clock: C,
}

impl<G, C> Clone for ResourceLimiter<G, C>
where
    C: Clock,
    G: Gate<C::Instant>,
{
    fn clone(&self) -> Self {
        ResourceLimiter {
            interval: self.interval,
            gate: self.gate.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl ResourceLimiter {
    /// Constructs a limiter on the default clock that grants access
    /// once per `interval`.
    ///
    /// # Examples
    /// ```
    /// # use std::time::Duration;
    /// use interval_gate::ResourceLimiter;
    ///
    /// let lim = ResourceLimiter::new(Duration::from_secs(1)).unwrap();
    /// assert!(lim.take(Duration::new(0, 0)));
    /// assert!(ResourceLimiter::new(Duration::new(0, 0)).is_err());
    /// ```
    pub fn new(interval: Duration) -> Result<Self, InvalidInterval> {
        Self::build_with_interval(interval).build()
    }
}

impl<G, C> ResourceLimiter<G, C>
where
    C: Clock,
    G: Gate<C::Instant>,
{
    /// Returns a builder that can be used to construct a limiter with
    /// a clock other than the default one.
    pub fn build_with_interval(interval: Duration) -> Builder<G, C> {
        Builder {
            interval,
            clock: C::default(),
            end_result: PhantomData,
        }
    }

    /// The interval that separates two callers.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns a handle to the clock this limiter reads and sleeps on.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Tries to get access to the resource, waiting at most `timeout`.
    ///
    /// Returns `true` as soon as the caller was granted access. If the
    /// next free slot lies further away than the remaining timeout,
    /// returns `false` right away instead of sleeping.
    ///
    /// Each time the caller wakes up, it asks the gate again: other
    /// callers may have taken the slot it was waiting for, in which
    /// case it waits for the following one if its timeout allows.
    pub fn take(&self, timeout: Duration) -> bool {
        let mut remaining = timeout;
        loop {
            let wait = self.gate.try_take(self.clock.now(), self.interval);
            if wait == Duration::new(0, 0) {
                trace!(?timeout, "granted");
                return true;
            }
            if wait > remaining {
                trace!(?wait, ?remaining, "denied");
                return false;
            }
            trace!(?wait, ?remaining, "waiting for the next slot");
            remaining -= wait;
            self.clock.sleep(wait);
        }
    }
}

/// An object that allows incrementally constructing limiters.
#[derive(Debug)]
pub struct Builder<G, C>
where
    C: Clock,
    G: Gate<C::Instant>,
{
    interval: Duration,
    clock: C,
    end_result: PhantomData<G>,
}

impl<G, C> Builder<G, C>
where
    C: Clock,
    G: Gate<C::Instant>,
{
    /// Sets the clock that the limiter reads the time from and sleeps
    /// on. Clones of the clock keep observing the same time, so a
    /// test can hold on to a [`MockClock`](../clock/struct.MockClock.html)
    /// and drive the limiter with it.
    pub fn clock(&mut self, clock: C) -> &mut Builder<G, C> {
        self.clock = clock;
        self
    }

    /// Builds a limiter with the given parameters. The gate's first
    /// slot is free immediately.
    pub fn build(&self) -> Result<ResourceLimiter<G, C>, InvalidInterval> {
        if self.interval == Duration::new(0, 0) {
            return Err(InvalidInterval::new(self.interval));
        }
        Ok(ResourceLimiter {
            interval: self.interval,
            gate: Arc::new(G::construct(self.clock.now())),
            clock: self.clock.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clock::MockClock;
    use crate::gate::LockingGate;

    type MockLimiter = ResourceLimiter<LockingGate<Duration>, MockClock>;

    #[test]
    fn rejects_zero_interval() {
        let err = MockLimiter::build_with_interval(Duration::new(0, 0))
            .build()
            .unwrap_err();
        assert_eq!(Duration::new(0, 0), err.interval());
    }

    #[test]
    fn clones_share_the_gate() {
        let clock = MockClock::default();
        let lim = MockLimiter::build_with_interval(Duration::from_secs(1))
            .clock(clock.clone())
            .build()
            .unwrap();
        let other = lim.clone();
        assert!(lim.take(Duration::new(0, 0)));
        assert!(!other.take(Duration::new(0, 0)));
        clock.add(Duration::from_secs(1));
        assert!(other.take(Duration::new(0, 0)));
        assert_eq!(Duration::from_secs(1), other.interval());
    }
}
