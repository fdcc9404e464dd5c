//! A module exporting the traits needed to use limiters, gates and clocks.

pub use crate::clock::Clock;
pub use crate::gate::Gate;
