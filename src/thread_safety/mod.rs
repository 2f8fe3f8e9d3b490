/// A trait providing interior mutability for rate-limiter
/// states. This can be backed by a `RefCell` (for single-threaded
/// operation), or an `Arc`-wrapped `Mutex` for operations where the
/// rate limiter states are expected to be `Sync`.
///
/// Clones of a wrapper refer to the same state.
pub(crate) trait StateWrapper: Default + Clone {
    /// The rate limiter state type.
    type Wrapped: Default;

    /// Gives `f` exclusive access to the wrapped state and returns
    /// its result. Everything `f` does happens in one critical
    /// section: no other caller can observe or change the state
    /// until `f` returns.
    fn measure_and_update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Self::Wrapped) -> R;

    /// Gives `f` a read-only look at the wrapped state.
    ///
    /// # Thread safety
    /// This function operates threadsafely, but what `f` sees will
    /// change as soon as it returns. Relying on that data *will*
    /// race.
    fn inspect<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Self::Wrapped) -> R;
}

#[cfg(feature = "sync")]
mod sync;

#[cfg(feature = "sync")]
pub(crate) use self::sync::*;

#[cfg(feature = "sync")]
/// The type used to wrap the rate-limiter state.
pub(crate) type Wrapper<T> = ThreadsafeWrapper<T>;

#[cfg(not(feature = "sync"))]
mod no_sync;

#[cfg(not(feature = "sync"))]
pub(crate) use self::no_sync::*;

#[cfg(not(feature = "sync"))]
/// The type used to wrap the rate-limiter state.
pub(crate) type Wrapper<T> = SingleThreadedWrapper<T>;
