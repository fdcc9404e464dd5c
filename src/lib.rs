//! # Interval gates in Rust
//!
//! This crate grants access to a single shared resource at most once
//! per fixed time interval. Any number of threads may ask for access
//! concurrently; each one is released no sooner than `interval` after
//! the previously released caller, or gives up once waiting any
//! longer would exceed its timeout.
//!
//! ## Interface
//!
//! The entry point is the [`ResourceLimiter`]. It is constructed with
//! the interval, and its only operation,
//! [`take`](limiter/struct.ResourceLimiter.html#method.take), takes the
//! longest time a caller is willing to wait:
//!
//! ``` rust
//! use std::time::Duration;
//! use interval_gate::ResourceLimiter;
//!
//! let lim = ResourceLimiter::new(Duration::from_millis(20)).unwrap();
//! assert!(lim.take(Duration::from_secs(1))); // the first caller is free
//! assert!(!lim.take(Duration::from_millis(1))); // the next one has to wait 20ms
//! ```
//!
//! There is no third outcome: `true` means access was granted (and
//! the next caller's slot moved one interval into the future),
//! `false` means the timeout was too short to reach the next free
//! slot. A caller that gets `false` never sleeps.
//!
//! ## Gates
//!
//! The decision whether a caller may proceed is made by a
//! [`Gate`](gate/trait.Gate.html), which keeps a single timestamp:
//! the earliest moment at which the next caller may go. Two
//! strategies are provided, and they behave identically:
//!
//! * [`LockFreeGate`](gate/struct.LockFreeGate.html) (the default)
//!   keeps the timestamp in an atomic and updates it with
//!   compare-and-swap.
//! * [`LockingGate`](gate/struct.LockingGate.html) keeps the timestamp
//!   behind a mutex.
//!
//! ## Testing time-dependent code
//!
//! The limiter reads time and sleeps through a
//! [`Clock`](clock/trait.Clock.html). In production this is the
//! [`MonotonicClock`](clock/struct.MonotonicClock.html). For tests,
//! the [`MockClock`](clock/struct.MockClock.html) never advances on
//! its own: the test moves it forward, and every thread sleeping on
//! it is woken in deadline order before the call returns. This makes
//! scenarios with many concurrent callers fully deterministic:
//!
//! ```
//! use std::time::Duration;
//! use interval_gate::{clock::MockClock, LockFreeGate, ResourceLimiter};
//!
//! let clock = MockClock::default();
//! let lim = ResourceLimiter::<LockFreeGate<Duration>, MockClock>::build_with_interval(
//!     Duration::from_secs(1),
//! )
//! .clock(clock.clone())
//! .build()
//! .unwrap();
//!
//! let clients: Vec<_> = (0..2)
//!     .map(|_| {
//!         let lim = lim.clone();
//!         clock.spawn(move || lim.take(Duration::from_millis(1500)))
//!     })
//!     .collect();
//!
//! clock.add(Duration::from_secs(1));
//! let granted = clients
//!     .into_iter()
//!     .map(|c| c.join().unwrap())
//!     .filter(|ok| *ok)
//!     .count();
//! assert_eq!(2, granted);
//! ```

pub mod clock;
pub mod errors;
pub mod gate;
pub mod limiter;
mod nanos;
pub mod prelude;

#[doc(hidden)]
pub mod test_utilities;

pub use self::errors::*;
pub use self::gate::{Gate, LockFreeGate, LockingGate};
pub use self::limiter::ResourceLimiter;

/// A facade around the std items used by the modules of this crate.
mod lib {
    pub use std::collections::{BTreeMap, HashSet};
    pub use std::convert::TryFrom;
    pub use std::fmt;
    pub use std::fmt::Debug;
    pub use std::marker::PhantomData;
    pub use std::ops::{Add, Sub};
    pub use std::sync::Arc;
    pub use std::thread;
    pub use std::time::{Duration, Instant};
}
