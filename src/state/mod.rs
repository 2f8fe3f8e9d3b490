//! In-memory rate limiters.

pub mod direct;

pub use self::direct::DirectRateLimiter;
