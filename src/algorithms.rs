//! Rate-limiting algorithms.

pub mod sliding_window_log;

pub use self::sliding_window_log::*;

use crate::clock;
use crate::lib::*;

/// Provides additional information about non-conforming cells, most
/// importantly the earliest time until the next cell could be
/// considered conforming.
///
/// Since this does not account for effects like thundering herds,
/// users should always add random jitter to the times given.
pub trait NonConformance<P: clock::Reference = <clock::DefaultClock as clock::Clock>::Instant>
where
    Self: Sized + PartialEq + fmt::Debug + fmt::Display,
{
    /// Returns the earliest time at which a decision could be
    /// conforming (excluding conforming decisions made by the rate
    /// limiter in the meantime).
    fn earliest_possible(&self) -> P;

    /// Returns the minimum amount of time from the time that the
    /// decision was made (relative to the `at` argument in a rate
    /// limiter's `check_at` method) that must pass before a decision
    /// can be conforming. Since Durations can not be negative, a zero
    /// duration is returned if `from` is already after that duration.
    fn wait_time_from(&self, from: P) -> Duration {
        let earliest = self.earliest_possible();
        earliest.duration_since(earliest.min(from))
    }
}
