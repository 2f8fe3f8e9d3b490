use super::StateWrapper;
use crate::lib::*;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct SingleThreadedWrapper<T> {
    data: Rc<RefCell<T>>,
}

impl<T: Default> Default for SingleThreadedWrapper<T> {
    fn default() -> Self {
        SingleThreadedWrapper {
            data: Rc::new(RefCell::new(T::default())),
        }
    }
}

impl<T> Clone for SingleThreadedWrapper<T> {
    fn clone(&self) -> Self {
        SingleThreadedWrapper {
            data: Rc::clone(&self.data),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SingleThreadedWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(&*self.data.borrow(), f)
    }
}

impl<T: Default> StateWrapper for SingleThreadedWrapper<T> {
    type Wrapped = T;

    /// # Panics
    /// Panics if `f` re-enters the same rate limiter.
    #[inline]
    fn measure_and_update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut *self.data.borrow_mut())
    }

    #[inline]
    fn inspect<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&*self.data.borrow())
    }
}
