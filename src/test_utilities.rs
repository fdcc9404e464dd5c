#![doc(hidden)]
//! A module for code shared between integration tests & benchmarks in this crate.

pub mod variants;

use crate::clock::{Clock, MockClock};
use crate::lib::*;
use crate::{Gate, InvalidInterval, ResourceLimiter};
use parking_lot::Mutex;
use std::thread::JoinHandle;

/// Returns a "current" moment that's suitable for tests.
pub fn current_moment() -> Instant {
    Instant::now()
}

/// A limiter running on a fresh mock clock, with a tally of the
/// outcomes of the clients that asked it for access.
pub struct Clients<G: Gate<Duration> + 'static> {
    limiter: ResourceLimiter<G, MockClock>,
    tally: Arc<Mutex<Tally>>,
    handles: Vec<JoinHandle<()>>,
}

#[derive(Debug, Default)]
struct Tally {
    granted: Vec<Duration>,
    denied: usize,
}

impl<G: Gate<Duration> + 'static> Clients<G> {
    pub fn new(interval: Duration) -> Result<Self, InvalidInterval> {
        let limiter = ResourceLimiter::build_with_interval(interval)
            .clock(MockClock::default())
            .build()?;
        Ok(Clients {
            limiter,
            tally: Default::default(),
            handles: vec![],
        })
    }

    pub fn clock(&self) -> &MockClock {
        self.limiter.clock()
    }

    /// Starts a client that asks for access with the given timeout.
    pub fn run(&mut self, timeout: Duration) {
        let limiter = self.limiter.clone();
        let tally = self.tally.clone();
        let handle = self.clock().spawn(move || {
            let granted = limiter.take(timeout);
            let at = limiter.clock().now();
            let mut tally = tally.lock();
            if granted {
                tally.granted.push(at);
            } else {
                tally.denied += 1;
            }
        });
        self.handles.push(handle);
    }

    /// Moves the clock forward, letting every client react to it.
    pub fn advance(&self, by: Duration) {
        self.clock().add(by)
    }

    /// Returns the number of clients that were granted access and
    /// the number that gave up.
    pub fn results(&self) -> (usize, usize) {
        let tally = self.tally.lock();
        (tally.granted.len(), tally.denied)
    }

    /// Returns the instants at which clients were granted access, in order.
    pub fn grants(&self) -> Vec<Duration> {
        self.tally.lock().granted.clone()
    }

    /// Lets every client run to completion.
    pub fn finish(&mut self) {
        self.clock().wait_for_all();
        for handle in self.handles.drain(..) {
            handle.join().expect("client panicked");
        }
    }
}

impl<G: Gate<Duration> + 'static> Drop for Clients<G> {
    fn drop(&mut self) {
        self.clock().wait_for_all();
        for handle in self.handles.drain(..) {
            drop(handle.join());
        }
    }
}
