//! Shared-pointer wrappers for operator state.
//!
//! `MutArc` wraps `Arc<Mutex<T>>` for mutable state shared between the stages
//! of a subscription; `CellArc` wraps `Arc<AtomicCell<T>>` for plain Copy
//! flags and counters where a mutex would be overkill.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_utils::atomic::AtomicCell;

use crate::observer::Observer;

/// Read access through a reference counted pointer.
pub trait RcDeref: Clone {
  type Target;
  type Ref<'a>: Deref<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Ref<'_>;
}

/// Write access through a reference counted pointer.
pub trait RcDerefMut: RcDeref {
  type MutRef<'a>: DerefMut<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref_mut(&self) -> Self::MutRef<'_>;
}

pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  #[inline]
  pub fn own(value: T) -> Self { MutArc(Arc::new(Mutex::new(value))) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { MutArc(self.0.clone()) }
}

impl<T: Default> Default for MutArc<T> {
  #[inline]
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Ref<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Ref<'_> { self.0.lock().unwrap() }
}

impl<T> RcDerefMut for MutArc<T> {
  type MutRef<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::MutRef<'_> { self.0.lock().unwrap() }
}

pub struct CellArc<T>(Arc<AtomicCell<T>>);

impl<T: Copy> CellArc<T> {
  #[inline]
  pub fn own(value: T) -> Self { CellArc(Arc::new(AtomicCell::new(value))) }

  #[inline]
  pub fn get(&self) -> T { self.0.load() }

  #[inline]
  pub fn set(&self, value: T) { self.0.store(value) }
}

impl<T: Copy> Clone for CellArc<T> {
  #[inline]
  fn clone(&self) -> Self { CellArc(self.0.clone()) }
}

/// The shared sink of a stateful operator: the downstream observer behind a
/// mutex, with `None` as the tombstone once a terminal event went through.
/// Forwarding `next` serializes on the mutex; terminal events take the
/// observer out first and deliver without the lock held, so a callback that
/// releases the subscription cannot deadlock against its own sink.
impl<O: Observer> Observer for MutArc<Option<O>> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    if let Some(observer) = self.rc_deref_mut().as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) {
    let observer = self.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.error(err);
    }
  }

  fn complete(&mut self) {
    let observer = self.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.complete();
    }
  }

  fn is_stopped(&self) -> bool {
    self.rc_deref().as_ref().map_or(true, |o| o.is_stopped())
  }
}
