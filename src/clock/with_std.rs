use super::{Clock, Reference};
use crate::lib::*;
use parking_lot::Mutex;
use std::time::SystemTime;

/// The default clock that reports [`Instant`]s.
pub type DefaultClock = MonotonicClock;

/// A mock implementation of a clock tracking [`Instant`]s. All it
/// does is keep track of what "now" is by allowing the program to
/// increment the current time (taken at time of construction) by some
/// arbitrary [`Duration`].
///
/// Clones share the same notion of "now".
#[derive(Debug, Clone)]
pub struct FakeAbsoluteClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for FakeAbsoluteClock {
    fn default() -> Self {
        FakeAbsoluteClock {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }
}

impl FakeAbsoluteClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&mut self, by: Duration) {
        *(self.now.lock()) += by
    }
}

impl Clock for FakeAbsoluteClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        *self.now.lock()
    }
}

/// A mock clock that reports [`Duration`]s elapsed since an
/// arbitrary epoch. It starts out at zero and only moves when the
/// program advances it.
///
/// Clones share the same notion of "now".
#[derive(Debug, Clone, Default)]
pub struct FakeRelativeClock {
    now: Arc<Mutex<Duration>>,
}

impl FakeRelativeClock {
    /// Advances the fake clock by the given amount.
    pub fn advance(&mut self, by: Duration) {
        *(self.now.lock()) += by
    }
}

impl Clock for FakeRelativeClock {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        *self.now.lock()
    }
}

/// The monotonic clock implemented by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock();

impl Reference for Instant {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.saturating_duration_since(earlier)
    }

    fn checked_add(&self, by: Duration) -> Option<Self> {
        Instant::checked_add(self, by)
    }
}

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }
}

/// The non-monotonic clock implemented by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock();

impl Reference for SystemTime {
    /// Returns the difference in times between the two
    /// SystemTimes. Due to the fallible nature of SystemTimes,
    /// returns the zero duration if a negative duration would
    /// result (e.g. due to system clock adjustments).
    fn duration_since(&self, earlier: Self) -> Duration {
        self.duration_since(earlier)
            .unwrap_or_else(|_| Duration::new(0, 0))
    }

    fn checked_add(&self, by: Duration) -> Option<Self> {
        SystemTime::checked_add(self, by)
    }
}

impl Clock for SystemClock {
    type Instant = SystemTime;

    fn now(&self) -> Self::Instant {
        SystemTime::now()
    }
}
