//! # Sliding-window-log rate limiting in Rust
//!
//! This crate implements an exact [sliding window
//! log](https://en.wikipedia.org/wiki/Rate_limiting) rate limiter:
//! at most `limit` cells are let through in any trailing interval of
//! length `window`, with no burst at the edge between two fixed
//! windows.
//!
//! ## Interface
//!
//! A [`DirectRateLimiter`](state/direct/struct.DirectRateLimiter.html)
//! is constructed with a limit and a window length, and is asked
//! about each cell, either at a caller-supplied time stamp
//! (`check_at`) or at the current time of its clock (`check`):
//!
//! ``` rust
//! use std::time::Duration;
//! use ratelimit_window::DirectRateLimiter;
//! use ratelimit_window::clock::FakeRelativeClock;
//!
//! // Time stamps are milliseconds since some epoch the caller picks:
//! let lim = DirectRateLimiter::<FakeRelativeClock>::from_millis(60_000, 2).unwrap();
//! let ms = Duration::from_millis(1);
//! assert_eq!(Ok(()), lim.check_at(ms * 0));
//! assert_eq!(Ok(()), lim.check_at(ms * 10));
//! assert!(lim.check_at(ms * 20).is_err());
//! // the cell at 0ms only leaves the window after 60000ms:
//! assert!(lim.check_at(ms * 60_000).is_err());
//! assert_eq!(Ok(()), lim.check_at(ms * 60_001));
//! ```
//!
//! A negative decision is a plain `Err` value of type
//! [`RateLimitExceeded`](algorithms/sliding_window_log/struct.RateLimitExceeded.html),
//! which tells the caller when a retry could succeed. The crate never
//! waits or retries on the caller's behalf.
//!
//! ## Design and implementation of the sliding window log
//!
//! The limiter keeps the time stamps of all admitted cells in an
//! ordered log, oldest first, along with their count. Every decision
//! first drops the entries that have left the window from the front
//! of the log, then admits the cell iff fewer than `limit` entries
//! remain. Each entry is inserted and dropped exactly once, so a
//! decision is amortized O(1), and the log never holds more than
//! `limit` entries.
//!
//! An entry stamped `t` counts against decisions at any time up to
//! and including `t + window`; it is dropped only once a decision
//! happens strictly after that.
//!
//! ## Thread-safe operation
//!
//! With the default `sync` feature, the log lives behind a
//! `parking_lot` mutex, and the whole evict, check and record
//! sequence runs under a single lock acquisition. Clones of a
//! limiter share their state, so with the `sync` feature they can be
//! handed to other threads:
//!
//! ```
//! use ratelimit_window::DirectRateLimiter;
//! # use nonzero_ext::nonzero;
//!
//! let lim: DirectRateLimiter = DirectRateLimiter::per_second(nonzero!(50u32));
//! let other = lim.clone();
//! assert_eq!(Ok(()), other.check());
//! assert_eq!(Ok(()), lim.check());
//! assert_eq!(2, lim.count());
//! ```

pub mod algorithms;
pub mod clock;
pub mod errors;
pub mod prelude;
pub mod state;
mod thread_safety;

pub use self::algorithms::*;
pub use self::errors::*;
pub use self::state::*;

/// A facade around the parts of `std` this crate uses.
mod lib {
    pub use std::cmp;
    pub use std::collections::VecDeque;
    pub use std::fmt::{self, Debug};
    pub use std::num::NonZeroU32;
    pub use std::ops::{Add, Sub};
    pub use std::sync::Arc;
    pub use std::time::{Duration, Instant};
}
