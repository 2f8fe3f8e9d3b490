use super::StateWrapper;
use crate::lib::*;
use parking_lot::Mutex;

pub(crate) struct ThreadsafeWrapper<T> {
    data: Arc<Mutex<T>>,
}

impl<T: Default> Default for ThreadsafeWrapper<T> {
    fn default() -> Self {
        ThreadsafeWrapper {
            data: Arc::new(Mutex::new(T::default())),
        }
    }
}

impl<T> Clone for ThreadsafeWrapper<T> {
    fn clone(&self) -> Self {
        ThreadsafeWrapper {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ThreadsafeWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(&*self.data.lock(), f)
    }
}

impl<T: Default> StateWrapper for ThreadsafeWrapper<T> {
    type Wrapped = T;

    #[inline]
    fn measure_and_update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut data = self.data.lock();
        f(&mut *data)
    }

    #[inline]
    fn inspect<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&*self.data.lock())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_one_critical_section() {
        let wrapper: ThreadsafeWrapper<u64> = Default::default();
        let children: Vec<_> = (0..8)
            .map(|_| {
                let wrapper = wrapper.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        wrapper.measure_and_update(|n| {
                            let seen = *n;
                            thread::yield_now();
                            *n = seen + 1;
                        });
                    }
                })
            })
            .collect();
        for child in children {
            child.join().unwrap();
        }
        assert_eq!(8000, wrapper.inspect(|n| *n));
    }
}
