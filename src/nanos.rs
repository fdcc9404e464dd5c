//! A time-keeping abstraction (nanoseconds) that works for storing in an atomic integer.

use crate::lib::*;

/// A number of nanoseconds from a reference point.
///
/// Can not represent durations >584 years, but hopefully that
/// should not be a problem in real-world applications.
#[derive(PartialEq, Eq, Default, Clone, Copy, PartialOrd, Ord)]
pub(crate) struct Nanos(u64);

impl Nanos {
    pub(crate) fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns how far `self` lies after `earlier`, or zero if it doesn't.
    pub(crate) fn saturating_sub(self, earlier: Nanos) -> Nanos {
        Nanos(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Debug for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let d = Duration::from_nanos(self.0);
        write!(f, "Nanos({:?})", d)
    }
}

impl From<Duration> for Nanos {
    fn from(d: Duration) -> Self {
        // Saturates rather than wrapping for durations past 584 years.
        Nanos(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }
}

impl From<u64> for Nanos {
    fn from(u: u64) -> Self {
        Nanos(u)
    }
}

impl From<Nanos> for Duration {
    fn from(n: Nanos) -> Self {
        Duration::from_nanos(n.0)
    }
}

impl Add<Nanos> for Nanos {
    type Output = Nanos;

    fn add(self, rhs: Nanos) -> Self::Output {
        Nanos(self.0.saturating_add(rhs.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nanos_sub_saturates() {
        let one = Nanos::from(1u64);
        let two = Nanos::from(2u64);
        assert_eq!(Nanos::from(1u64), two.saturating_sub(one));
        assert_eq!(Nanos::default(), one.saturating_sub(two));
    }

    #[test]
    fn nanos_duration_conversion() {
        let d = Duration::from_millis(1500);
        assert_eq!(d, Duration::from(Nanos::from(d)));
        assert_eq!(1_500_000_000, Nanos::from(d).as_u64());
    }
}
