//! Time sources for the rate limiter.
//!
//! Rate limiting decisions only ever look at the time stamps they
//! are handed. The clocks in this module supply those time stamps
//! for the `check` family of methods, and allow mocking the passage
//! of time.

use crate::lib::*;

/// A measurement from a clock.
pub trait Reference:
    Sized
    + Sub<Duration, Output = Self>
    + Add<Duration, Output = Self>
    + PartialEq
    + Eq
    + Ord
    + Copy
    + Clone
    + Send
    + Sync
    + Debug
{
    /// Determines the time that separates two measurements of a
    /// clock. Returns the zero duration if `earlier` is in fact
    /// later than `self`.
    fn duration_since(&self, earlier: Self) -> Duration;

    /// Adds `by` to the measurement, returning `None` if the result
    /// can not be represented.
    fn checked_add(&self, by: Duration) -> Option<Self>;

    /// Adds `by` to the measurement, stopping at the latest
    /// representable measurement instead of overflowing.
    fn saturating_add(self, by: Duration) -> Self {
        if let Some(sum) = self.checked_add(by) {
            return sum;
        }
        let zero = Duration::new(0, 0);
        let mut sum = self;
        let mut step = by / 2;
        while step > zero {
            match sum.checked_add(step) {
                Some(next) => sum = next,
                None => step /= 2,
            }
        }
        sum
    }
}

/// A time source used by rate limiters.
pub trait Clock: Default {
    /// A measurement of a monotonically increasing clock.
    type Instant: Reference;

    /// Returns a measurement of the clock.
    fn now(&self) -> Self::Instant;
}

/// Durations act as time stamps relative to a fixed point in time
/// that the caller picks, e.g. "milliseconds since the service
/// started".
impl Reference for Duration {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.saturating_sub(earlier)
    }

    fn checked_add(&self, by: Duration) -> Option<Self> {
        Duration::checked_add(*self, by)
    }
}

mod with_std;
pub use with_std::*;
