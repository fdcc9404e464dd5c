use crate::lib::*;

/// An error that is returned when constructing a limiter whose
/// interval could never separate two callers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidInterval {
    interval: Duration,
}

impl InvalidInterval {
    pub(crate) fn new(interval: Duration) -> InvalidInterval {
        InvalidInterval { interval }
    }

    /// The interval that was rejected.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl fmt::Display for InvalidInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "interval {:?} is not positive, a limiter needs a non-zero interval",
            self.interval
        )
    }
}

impl std::error::Error for InvalidInterval {}
