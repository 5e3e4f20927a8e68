//! Reference-counted state shared between a subject and its subscriptions.
//!
//! Both pointer flavours hand out a `&RefCell<T>` through [`RcDeref`]:
//!
//! - [`MutRc`] is a plain `Rc<RefCell<T>>` for single-threaded subjects.
//! - [`MutArc`] puts the `RefCell` behind a reentrant mutex. The guard is held
//!   for a whole delivery pass, so other threads wait for the pass to finish
//!   while the dispatching thread can still re-enter from inside a callback.

use std::{cell::RefCell, ops::Deref, rc::Rc, sync::Arc};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Unified access to the `RefCell` held by a shared pointer.
pub trait RcDeref {
  type Target;
  type Guard<'a>: Deref<Target = RefCell<Self::Target>>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Guard<'_>;
}

/// Single-threaded shared state.
pub struct MutRc<T>(Rc<RefCell<T>>);

/// Thread-safe shared state guarded by a reentrant mutex.
pub struct MutArc<T>(Arc<ReentrantMutex<RefCell<T>>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }
}

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(ReentrantMutex::new(RefCell::new(t)))) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> From<T> for MutArc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> RcDeref for MutRc<T> {
  type Target = T;
  type Guard<'a>
    = &'a RefCell<T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { &self.0 }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Guard<'a>
    = ReentrantMutexGuard<'a, RefCell<T>>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.lock() }
}
