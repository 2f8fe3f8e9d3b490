//! An in-memory rate limiter that can make decisions for a single
//! situation.

use crate::lib::*;
use crate::{
    algorithms::{RateLimitExceeded, SlidingWindowLog, State},
    clock::{self, Clock},
    InvalidConfiguration, NegativeMultiDecision,
};
use tracing::debug;

/// An in-memory rate limiter that makes direct (un-keyed)
/// rate-limiting decisions. Direct rate limiters can be used to
/// e.g. throttle callers of a single API endpoint, or to bound the
/// use of a shared resource from a worker pool.
///
/// Clones share the same sliding window log, so a limiter can be
/// cloned into as many threads as need to be throttled together.
#[derive(Clone)]
pub struct DirectRateLimiter<C: Clock = clock::DefaultClock> {
    state: State<C::Instant>,
    algorithm: SlidingWindowLog,
    clock: C,
}

impl<C: Clock> fmt::Debug for DirectRateLimiter<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("DirectRateLimiter")
            .field("limit", &self.algorithm.limit())
            .field("window", &self.algorithm.window())
            .field("state", &self.state)
            .finish()
    }
}

impl<C> DirectRateLimiter<C>
where
    C: Clock,
{
    /// Construct a new rate limiter that allows `limit` cells through
    /// in any interval of length `window`.
    /// # Examples
    /// ```
    /// # use std::time::Duration;
    /// use ratelimit_window::DirectRateLimiter;
    /// # use nonzero_ext::nonzero;
    /// let _lim: DirectRateLimiter = DirectRateLimiter::new(nonzero!(100u32), Duration::from_secs(5)).unwrap();
    /// assert!(DirectRateLimiter::<ratelimit_window::clock::MonotonicClock>::new(nonzero!(1u32), Duration::new(0, 0)).is_err());
    /// ```
    pub fn new(limit: NonZeroU32, window: Duration) -> Result<Self, InvalidConfiguration> {
        Self::build_with_capacity(limit).per(window).build()
    }

    /// Construct a new rate limiter from plain numbers: `limit` cells
    /// are allowed through in any interval of `window_ms`
    /// milliseconds.
    /// # Examples
    /// ```
    /// use ratelimit_window::{DirectRateLimiter, InvalidConfiguration};
    /// use ratelimit_window::clock::FakeRelativeClock;
    /// type Limiter = DirectRateLimiter<FakeRelativeClock>;
    /// assert!(Limiter::from_millis(60_000, 2).is_ok());
    /// assert_eq!(Some(InvalidConfiguration::ZeroLimit), Limiter::from_millis(60_000, 0).err());
    /// assert_eq!(Some(InvalidConfiguration::ZeroWindow), Limiter::from_millis(0, 2).err());
    /// ```
    pub fn from_millis(window_ms: u64, limit: u32) -> Result<Self, InvalidConfiguration> {
        let limit = NonZeroU32::new(limit).ok_or(InvalidConfiguration::ZeroLimit)?;
        Self::new(limit, Duration::from_millis(window_ms))
    }

    /// Construct a new rate limiter that allows `limit` cells per
    /// second.
    /// # Examples
    /// ```
    /// use ratelimit_window::DirectRateLimiter;
    /// # use nonzero_ext::nonzero;
    /// let _lim: DirectRateLimiter = DirectRateLimiter::per_second(nonzero!(100u32));
    /// ```
    pub fn per_second(limit: NonZeroU32) -> Self {
        Self::from_parts(
            SlidingWindowLog::fixed(limit, Duration::from_secs(1)),
            C::default(),
        )
    }

    /// Construct a new rate limiter that allows `limit` cells per
    /// minute.
    pub fn per_minute(limit: NonZeroU32) -> Self {
        Self::from_parts(
            SlidingWindowLog::fixed(limit, Duration::from_secs(60)),
            C::default(),
        )
    }

    /// Return a builder that can be used to construct a rate limiter using
    /// the parameters passed to the Builder.
    pub fn build_with_capacity(limit: NonZeroU32) -> Builder<C> {
        Builder {
            limit,
            window: Duration::from_secs(1),
            clock: None,
        }
    }

    fn from_parts(algorithm: SlidingWindowLog, clock: C) -> Self {
        debug!(
            limit = algorithm.limit().get(),
            window_ms = algorithm.window().as_millis() as u64,
            "constructed rate limiter"
        );
        DirectRateLimiter {
            state: State::default(),
            algorithm,
            clock,
        }
    }

    /// Tests if a single cell can be accommodated at the current time
    /// of the limiter's clock. If it can be, `check` records the
    /// conforming cell and returns `Ok(())`.
    ///
    /// If the cell is non-conforming (i.e., it can't be accomodated
    /// at this time stamp), `check` returns `Err` with information
    /// about the earliest time at which a cell could be considered
    /// conforming.
    pub fn check(&self) -> Result<(), RateLimitExceeded<C::Instant>> {
        self.check_at(self.clock.now())
    }

    /// Tests whether a single cell can be accommodated at the given
    /// time stamp. See [`check`](#method.check).
    pub fn check_at(&self, at: C::Instant) -> Result<(), RateLimitExceeded<C::Instant>> {
        self.algorithm.test_and_update(&self.state, at)
    }

    /// Tests if `n` cells can be accommodated at the current time
    /// stamp. If (and only if) all cells in the batch can be
    /// accomodated, the rate limiter records all of them and returns
    /// `Ok(())`.
    ///
    /// If the entire batch of cells would not be conforming but the
    /// rate limiter has the capacity to accomodate the cells at any
    /// point in time, `check_n` returns error
    /// [`NegativeMultiDecision::BatchNonConforming`](../../enum.NegativeMultiDecision.html#variant.BatchNonConforming),
    /// holding the number of cells the rate limiter's negative
    /// outcome result.
    ///
    /// If `n` exceeds the limit, `check_n` returns
    /// [`NegativeMultiDecision::InsufficientCapacity`](../../enum.NegativeMultiDecision.html#variant.InsufficientCapacity),
    /// indicating that a batch of this many cells can never succeed.
    pub fn check_n(
        &self,
        n: u32,
    ) -> Result<(), NegativeMultiDecision<RateLimitExceeded<C::Instant>>> {
        self.check_n_at(n, self.clock.now())
    }

    /// Tests if `n` cells can be accommodated at the given time
    /// stamp, see [`check_n`](#method.check_n).
    pub fn check_n_at(
        &self,
        n: u32,
        at: C::Instant,
    ) -> Result<(), NegativeMultiDecision<RateLimitExceeded<C::Instant>>> {
        self.algorithm.test_n_and_update(&self.state, n, at)
    }

    /// Runs `operation` if a single cell can be accommodated at the
    /// current time of the limiter's clock, returning its result.
    /// Otherwise, `operation` is not run at all.
    pub fn guard<T, F>(&self, operation: F) -> Result<T, RateLimitExceeded<C::Instant>>
    where
        F: FnOnce() -> T,
    {
        self.guard_at(self.clock.now(), operation)
    }

    /// Runs `operation` if a single cell can be accommodated at the
    /// given time stamp, see [`guard`](#method.guard).
    ///
    /// The limiter's lock is released before `operation` runs, so
    /// `operation` may itself consult this limiter.
    /// # Examples
    /// ```
    /// # use std::time::Duration;
    /// use ratelimit_window::DirectRateLimiter;
    /// use ratelimit_window::clock::FakeRelativeClock;
    /// let lim = DirectRateLimiter::<FakeRelativeClock>::from_millis(60_000, 1).unwrap();
    /// let now = Duration::from_millis(5);
    /// assert_eq!(Ok(5), lim.guard_at(now, || 2 + 3));
    /// assert!(lim.guard_at(now, || unreachable!()).is_err());
    /// ```
    pub fn guard_at<T, F>(
        &self,
        at: C::Instant,
        operation: F,
    ) -> Result<T, RateLimitExceeded<C::Instant>>
    where
        F: FnOnce() -> T,
    {
        self.check_at(at)?;
        Ok(operation())
    }

    /// Returns the number of cells currently in the log.
    ///
    /// Expired cells are only dropped by the next decision, so this
    /// includes cells that have left the window since then.
    ///
    /// # Thread safety
    /// The count can change as soon as it is returned; relying on it
    /// for decisions *will* race.
    pub fn count(&self) -> usize {
        self.state.count()
    }

    /// The maximum number of cells admitted per window.
    pub fn limit(&self) -> NonZeroU32 {
        self.algorithm.limit()
    }

    /// The length of the trailing window.
    pub fn window(&self) -> Duration {
        self.algorithm.window()
    }

    /// The clock that `check`, `check_n` and `guard` read the time
    /// from.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// An object that allows incrementally constructing rate Limiter
/// objects.
pub struct Builder<C>
where
    C: Clock,
{
    limit: NonZeroU32,
    window: Duration,
    clock: Option<C>,
}

impl<C> Builder<C>
where
    C: Clock,
{
    /// Sets the length of the trailing window, in which at most the
    /// builder's limit of cells are let through. Defaults to one
    /// second.
    pub fn per(&mut self, window: Duration) -> &mut Builder<C> {
        self.window = window;
        self
    }

    /// Sets the clock the rate limiter reads the current time from.
    /// Defaults to `C::default()`.
    pub fn using_clock(&mut self, clock: C) -> &mut Builder<C> {
        self.clock = Some(clock);
        self
    }

    /// Builds a rate limiter with the given parameters.
    pub fn build(&mut self) -> Result<DirectRateLimiter<C>, InvalidConfiguration> {
        let algorithm = SlidingWindowLog::construct(self.limit, self.window)?;
        let clock = self.clock.take().unwrap_or_default();
        Ok(DirectRateLimiter::from_parts(algorithm, clock))
    }
}
