use std::mem::replace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

/// Subscription returned from `Observable.subscribe(..)` to allow
/// unsubscribing before the stream has delivered all of its events.
///
/// Unsubscribing is idempotent, and once a subscription is closed no new
/// callback starts on the chain it guards (callbacks already in flight may
/// finish).
pub trait SubscriptionLike {
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl<S: SubscriptionLike + ?Sized> SubscriptionLike for Box<S> {
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }
  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

type BoxSubscription = Box<dyn SubscriptionLike + Send>;

enum Teardown {
  None,
  Once(BoxSubscription),
  Multi(Vec<BoxSubscription>),
}

struct Inner {
  closed: bool,
  teardown: Teardown,
}

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: Teardown::None } }
}

/// The composable subscription: an ordered set of inner subscriptions that
/// all close together. Adding to an already closed subscription unsubscribes
/// the child immediately and does not retain it.
#[derive(Clone, Default)]
pub struct SharedSubscription(Arc<Mutex<Inner>>);

impl SharedSubscription {
  pub fn add(&self, subscription: impl SubscriptionLike + Send + 'static) {
    let mut subscription: BoxSubscription = Box::new(subscription);
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
      return;
    }
    let teardown = &mut inner.teardown;
    match teardown {
      Teardown::None => *teardown = Teardown::Once(subscription),
      Teardown::Once(_) => {
        if let Teardown::Once(first) = replace(teardown, Teardown::None) {
          *teardown = Teardown::Multi(vec![first, subscription]);
        }
      }
      Teardown::Multi(subscriptions) => subscriptions.push(subscription),
    }
  }
}

impl SubscriptionLike for SharedSubscription {
  fn unsubscribe(&mut self) {
    // Move the teardown list out before running it, so teardown actions that
    // touch this subscription again observe it closed instead of deadlocking.
    let teardown = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      replace(&mut inner.teardown, Teardown::None)
    };
    match teardown {
      Teardown::None => {}
      Teardown::Once(mut subscription) => subscription.unsubscribe(),
      Teardown::Multi(mut subscriptions) => {
        subscriptions.iter_mut().for_each(|s| s.unsubscribe())
      }
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

#[derive(Default)]
struct SerialInner {
  closed: bool,
  current: Option<BoxSubscription>,
}

/// Holds at most one inner subscription; installing a new one unsubscribes
/// the previous. A closed serial unsubscribes anything handed to it.
#[derive(Clone, Default)]
pub struct SerialSubscription(Arc<Mutex<SerialInner>>);

impl SerialSubscription {
  pub fn set(&self, subscription: impl SubscriptionLike + Send + 'static) {
    let mut incoming: BoxSubscription = Box::new(subscription);
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      drop(inner);
      incoming.unsubscribe();
      return;
    }
    let previous = inner.current.replace(incoming);
    drop(inner);
    if let Some(mut previous) = previous {
      previous.unsubscribe();
    }
  }
}

impl SubscriptionLike for SerialSubscription {
  fn unsubscribe(&mut self) {
    let current = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.current.take()
    };
    if let Some(mut current) = current {
      current.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

/// Runs a closure exactly once on the first `unsubscribe`. A panicking
/// teardown must not poison the rest of the release path, it is caught and
/// logged.
pub struct TeardownFn(Option<Box<dyn FnOnce() + Send>>);

impl TeardownFn {
  #[inline]
  pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
    TeardownFn(Some(Box::new(teardown)))
  }
}

impl SubscriptionLike for TeardownFn {
  fn unsubscribe(&mut self) {
    if let Some(teardown) = self.0.take() {
      if catch_unwind(AssertUnwindSafe(teardown)).is_err() {
        log::warn!("rx-core: teardown action panicked during unsubscribe");
      }
    }
  }

  fn is_closed(&self) -> bool { self.0.is_none() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct CountTeardown(Arc<AtomicUsize>);

  impl SubscriptionLike for CountTeardown {
    fn unsubscribe(&mut self) { self.0.fetch_add(1, Ordering::SeqCst); }
    fn is_closed(&self) -> bool { self.0.load(Ordering::SeqCst) > 0 }
  }

  #[test]
  fn unsubscribe_runs_teardowns_once() {
    let released = Arc::new(AtomicUsize::new(0));
    let mut subscription = SharedSubscription::default();
    subscription.add(CountTeardown(released.clone()));
    subscription.add(CountTeardown(released.clone()));

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(released.load(Ordering::SeqCst), 2);
    assert!(subscription.is_closed());
  }

  #[test]
  fn add_after_close_releases_immediately() {
    let released = Arc::new(AtomicUsize::new(0));
    let mut subscription = SharedSubscription::default();
    subscription.unsubscribe();

    subscription.add(CountTeardown(released.clone()));
    assert_eq!(released.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn serial_replaces_previous() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let serial = SerialSubscription::default();

    serial.set(CountTeardown(first.clone()));
    serial.set(CountTeardown(second.clone()));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);

    let mut handle = serial.clone();
    handle.unsubscribe();
    assert_eq!(second.load(Ordering::SeqCst), 1);

    let third = Arc::new(AtomicUsize::new(0));
    serial.set(CountTeardown(third.clone()));
    assert_eq!(third.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn teardown_fn_swallows_panic() {
    let mut teardown = TeardownFn::new(|| panic!("boom"));
    teardown.unsubscribe();
    assert!(teardown.is_closed());
  }
}
