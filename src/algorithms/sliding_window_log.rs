//! An exact sliding window log.

use crate::lib::*;
use crate::thread_safety::{StateWrapper, Wrapper};
use crate::{clock, InvalidConfiguration, NegativeMultiDecision, NonConformance};

use tracing::{debug, trace};

/// The smallest step a time stamp can take. An entry exactly a
/// window old still counts, so a slot frees up one step after that.
const RESOLUTION: Duration = Duration::from_nanos(1);

/// Implements the sliding window log: every conforming cell's time
/// stamp is kept in an ordered log, and a cell at time `t` is
/// conforming iff fewer than `limit` logged cells are at most
/// `window` old at `t`.
///
/// # Eviction
///
/// There is no background task expiring old entries. Instead, every
/// call to [`check`](../../state/direct/struct.DirectRateLimiter.html#method.check)
/// and related methods first drops all entries that are strictly
/// older than `window` from the front of the log. Being ordered, the
/// log can stop at the first entry that is still inside the window.
///
/// # Out-of-order time stamps
///
/// Time stamps older than the latest decision (e.g. from parallel
/// callers that got re-ordered on their way to the lock) are treated
/// as if they had arrived at the time of that latest decision. This
/// keeps the log ordered, and never lets a cell in on the strength of
/// entries that were already dropped, at the cost of counting such a
/// cell a little longer than its own time stamp would suggest.
///
/// # Example
/// ``` rust
/// # use std::time::Duration;
/// use ratelimit_window::{DirectRateLimiter, NonConformance};
/// use ratelimit_window::clock::FakeRelativeClock;
/// # use nonzero_ext::nonzero;
/// let lim = DirectRateLimiter::<FakeRelativeClock>::new(nonzero!(1u32), Duration::from_secs(1)).unwrap();
/// let now = Duration::from_secs(10);
/// assert_eq!(Ok(()), lim.check_at(now));
/// let wait = lim.check_at(now).unwrap_err().wait_time_from(now);
/// assert!(lim.check_at(now + Duration::from_secs(1)).is_err());
/// assert_eq!(Ok(()), lim.check_at(now + wait));
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SlidingWindowLog {
    window: Duration,
    limit: NonZeroU32,
}

impl SlidingWindowLog {
    /// Constructs the parameters of a sliding window log that admits
    /// `limit` cells in any interval of length `window`.
    pub fn construct(limit: NonZeroU32, window: Duration) -> Result<Self, InvalidConfiguration> {
        if window == Duration::new(0, 0) {
            return Err(InvalidConfiguration::ZeroWindow);
        }
        Ok(SlidingWindowLog { window, limit })
    }

    /// For windows that are known to be non-empty.
    pub(crate) const fn fixed(limit: NonZeroU32, window: Duration) -> Self {
        SlidingWindowLog { window, limit }
    }

    /// The maximum number of cells admitted per window.
    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// The length of the trailing window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Tests if `n` cells can be accommodated in the log at the
    /// instant `at` and, if so, records them.
    ///
    /// The update is all or nothing: Unless all n cells can be
    /// accommodated, no cell is recorded. Expired entries are dropped
    /// from the log in either case.
    pub(crate) fn test_n_and_update<P: clock::Reference>(
        &self,
        state: &State<P>,
        n: u32,
        at: P,
    ) -> Result<(), NegativeMultiDecision<RateLimitExceeded<P>>> {
        if n > self.limit.get() {
            return Err(NegativeMultiDecision::InsufficientCapacity(n));
        }
        let limit = self.limit.get() as usize;
        let result = state.0.measure_and_update(|log| {
            // Prevent time travel: answer from the latest decision
            // onwards if this call got re-ordered behind a later one.
            let t0 = log.latest.map_or(at, |latest| cmp::max(at, latest));
            log.latest = Some(t0);
            let evicted = log.evict(t0, self.window);
            if evicted > 0 {
                trace!(evicted, remaining = log.count, "dropped expired entries");
            }

            let n = n as usize;
            if log.count + n <= limit {
                log.record(t0, n);
                trace!(cells = n, count = log.count, "admitted");
                Ok(())
            } else {
                // count <= limit and n <= limit, so this many entries
                // have to leave the window before the batch fits:
                let blocking = log.entries[log.count + n - limit - 1];
                Err(RateLimitExceeded {
                    at: t0,
                    earliest: blocking.saturating_add(self.window).saturating_add(RESOLUTION),
                    limit: self.limit,
                    window: self.window,
                })
            }
        });
        result.map_err(|nc| {
            debug!(
                cells = n,
                limit = self.limit.get(),
                window_ms = self.window.as_millis() as u64,
                "rate limit exceeded"
            );
            NegativeMultiDecision::BatchNonConforming(n, nc)
        })
    }

    /// Tests if a single cell can be accommodated in the log at the
    /// instant `at` and, if so, records it.
    pub(crate) fn test_and_update<P: clock::Reference>(
        &self,
        state: &State<P>,
        at: P,
    ) -> Result<(), RateLimitExceeded<P>> {
        match self.test_n_and_update(state, 1, at) {
            Ok(()) => Ok(()),
            Err(NegativeMultiDecision::BatchNonConforming(1, nc)) => Err(nc),
            Err(other) => unreachable!(
                "BUG: measuring a batch of size 1 reported insufficient capacity: {:?}",
                other
            ),
        }
    }
}

/// Represents the state of a single sliding window log.
#[derive(Debug, Clone)]
pub struct State<P: clock::Reference>(Wrapper<Log<P>>);

impl<P: clock::Reference> Default for State<P> {
    fn default() -> Self {
        State(Wrapper::default())
    }
}

impl<P: clock::Reference> State<P> {
    /// Returns the number of cells currently logged. Entries are only
    /// dropped by decisions, so this may include cells that have
    /// already left the window.
    ///
    /// # Thread safety
    /// The count can change the moment the lock is released; relying
    /// on it for decisions *will* race.
    pub(crate) fn count(&self) -> usize {
        self.0.inspect(|log| log.count)
    }
}

/// The admitted time stamps, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Log<P> {
    entries: VecDeque<P>,
    count: usize,
    /// The time of the latest decision, conforming or not.
    latest: Option<P>,
}

impl<P> Default for Log<P> {
    fn default() -> Self {
        Log {
            entries: VecDeque::new(),
            count: 0,
            latest: None,
        }
    }
}

impl<P: clock::Reference> Log<P> {
    /// Drops every entry that is more than `window` older than `now`,
    /// returning how many were dropped.
    fn evict(&mut self, now: P, window: Duration) -> usize {
        let mut evicted = 0;
        while let Some(oldest) = self.entries.front() {
            if now.duration_since(*oldest) <= window {
                break;
            }
            self.entries.pop_front();
            self.count -= 1;
            evicted += 1;
        }
        evicted
    }

    fn record(&mut self, at: P, n: usize) {
        self.entries.extend(std::iter::repeat(at).take(n));
        self.count += n;
    }
}

/// Returned in case of a negative rate-limiting decision.
///
/// To avoid the thundering herd effect, client code should always add
/// some jitter to the wait time.
///
/// If the earliest conforming time lies beyond what the time stamp
/// type can represent, the latest representable time stamp is
/// reported instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limit of {limit} cells per {window:?} exceeded, retry at {earliest:?}")]
pub struct RateLimitExceeded<P: clock::Reference> {
    at: P,
    earliest: P,
    limit: NonZeroU32,
    window: Duration,
}

impl<P: clock::Reference> RateLimitExceeded<P> {
    /// The time this decision was made at. This is later than the
    /// time stamp that was checked if that time stamp arrived out of
    /// order.
    pub fn decided_at(&self) -> P {
        self.at
    }

    /// The limit that was exceeded.
    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }
}

impl<P: clock::Reference> NonConformance<P> for RateLimitExceeded<P> {
    #[inline]
    fn earliest_possible(&self) -> P {
        self.earliest
    }
}
