use crate::observer::Observer;
use crate::subscription::{SharedSubscription, SubscriptionLike};

/// Couples the observer chain of one subscription with the subscription that
/// cancels it. Operators rebuild the pair around their own observer on the
/// way to the source; the source drives the outermost instance.
///
/// Delivery is gated on the subscription: once it is closed, nothing is
/// forwarded, whatever a misbehaving source keeps emitting.
pub struct Subscriber<O> {
  pub observer: O,
  pub subscription: SharedSubscription,
}

impl<O> Subscriber<O> {
  #[inline]
  pub fn new(observer: O) -> Self {
    Subscriber { observer, subscription: SharedSubscription::default() }
  }
}

impl<O: Observer> Observer for Subscriber<O> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    if !self.subscription.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) {
    if !self.subscription.is_closed() {
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.subscription.is_closed() {
      self.observer.complete();
    }
  }

  fn is_stopped(&self) -> bool {
    self.subscription.is_closed() || self.observer.is_stopped()
  }
}

impl<O> SubscriptionLike for Subscriber<O> {
  #[inline]
  fn unsubscribe(&mut self) { self.subscription.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

/// Protocol-enforcing wrapper installed around the terminal observer of every
/// subscription. On `complete`/`error` it clears the inner observer, delivers
/// the terminal event once, and then closes the whole chain upstream, so the
/// grammar `next* (complete | error)?` holds at the boundary even when a
/// source misbehaves.
pub struct AutoDetachObserver<O> {
  observer: Option<O>,
  subscription: SharedSubscription,
}

impl<O> AutoDetachObserver<O> {
  #[inline]
  pub fn new(observer: O, subscription: SharedSubscription) -> Self {
    AutoDetachObserver { observer: Some(observer), subscription }
  }
}

impl<O: Observer> Observer for AutoDetachObserver<O> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    if self.subscription.is_closed() {
      return;
    }
    if let Some(observer) = self.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) {
    if let Some(mut observer) = self.observer.take() {
      if !self.subscription.is_closed() {
        observer.error(err);
      }
    }
    self.subscription.unsubscribe();
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      if !self.subscription.is_closed() {
        observer.complete();
      }
    }
    self.subscription.unsubscribe();
  }

  fn is_stopped(&self) -> bool {
    self.subscription.is_closed() || self.observer.as_ref().map_or(true, |o| o.is_stopped())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::observer::ObserverAll;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn counting_observer(
    next: Arc<AtomicUsize>,
    error: Arc<AtomicUsize>,
    complete: Arc<AtomicUsize>,
  ) -> impl Observer<Item = i32, Err = ()> {
    ObserverAll::new(
      move |_| {
        next.fetch_add(1, Ordering::SeqCst);
      },
      move |_: ()| {
        error.fetch_add(1, Ordering::SeqCst);
      },
      move || {
        complete.fetch_add(1, Ordering::SeqCst);
      },
    )
  }

  #[test]
  fn next_and_complete() {
    let next = Arc::new(AtomicUsize::new(0));
    let error = Arc::new(AtomicUsize::new(0));
    let complete = Arc::new(AtomicUsize::new(0));

    let subscription = SharedSubscription::default();
    let observer =
      counting_observer(next.clone(), error.clone(), complete.clone());
    let mut subscriber = Subscriber {
      observer: AutoDetachObserver::new(observer, subscription.clone()),
      subscription,
    };

    subscriber.next(1);
    subscriber.next(2);
    subscriber.complete();
    subscriber.next(3);
    subscriber.complete();

    assert_eq!(next.load(Ordering::SeqCst), 2);
    assert_eq!(complete.load(Ordering::SeqCst), 1);
    assert!(subscriber.is_closed());
  }

  #[test]
  fn next_and_error() {
    let next = Arc::new(AtomicUsize::new(0));
    let error = Arc::new(AtomicUsize::new(0));
    let complete = Arc::new(AtomicUsize::new(0));

    let subscription = SharedSubscription::default();
    let observer =
      counting_observer(next.clone(), error.clone(), complete.clone());
    let mut subscriber = Subscriber {
      observer: AutoDetachObserver::new(observer, subscription.clone()),
      subscription,
    };

    subscriber.next(1);
    subscriber.error(());
    subscriber.next(2);
    subscriber.error(());
    subscriber.complete();

    assert_eq!(next.load(Ordering::SeqCst), 1);
    assert_eq!(error.load(Ordering::SeqCst), 1);
    assert_eq!(complete.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn unsubscribed_subscriber_is_silent() {
    let next = Arc::new(AtomicUsize::new(0));
    let error = Arc::new(AtomicUsize::new(0));
    let complete = Arc::new(AtomicUsize::new(0));

    let subscription = SharedSubscription::default();
    let observer =
      counting_observer(next.clone(), error.clone(), complete.clone());
    let mut subscriber = Subscriber {
      observer: AutoDetachObserver::new(observer, subscription.clone()),
      subscription,
    };

    subscriber.unsubscribe();
    subscriber.next(1);
    subscriber.complete();

    assert_eq!(next.load(Ordering::SeqCst), 0);
    assert_eq!(complete.load(Ordering::SeqCst), 0);
  }
}
