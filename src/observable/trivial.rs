use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

/// Creates an observable that produces no values and completes immediately.
pub fn empty<Item>() -> ObservableEmpty<Item> {
  ObservableEmpty(TypeHint::new())
}

#[derive(Clone)]
pub struct ObservableEmpty<Item>(TypeHint<Item>);

impl<Item: 'static> Observable for ObservableEmpty<Item> {
  type Item = Item;
  type Err = ();
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = ()> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let mut subscriber = subscriber;
    subscriber.complete();
    subscription
  }
}

/// Creates an observable that emits no items and terminates with `e`.
pub fn throw<Item, Err>(e: Err) -> ObservableThrow<Item, Err> {
  ObservableThrow(e, TypeHint::new())
}

#[derive(Clone)]
pub struct ObservableThrow<Item, Err>(Err, TypeHint<Item>);

impl<Item: 'static, Err: 'static> Observable for ObservableThrow<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let mut subscriber = subscriber;
    subscriber.error(self.0);
    subscription
  }
}

/// Creates an observable that never emits anything, never completes and
/// never errors.
pub fn never<Item, Err>() -> ObservableNever<Item, Err> {
  ObservableNever(TypeHint::new())
}

#[derive(Clone)]
pub struct ObservableNever<Item, Err>(TypeHint<(Item, Err)>);

impl<Item: 'static, Err: 'static> Observable for ObservableNever<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    subscriber.subscription
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn throw_delivers_only_the_error() {
    let hits = MutArc::own(0);
    let completed = CellArc::own(false);
    let seen = MutArc::own(String::new());
    let c_hits = hits.clone();
    let c_completed = completed.clone();
    let c_seen = seen.clone();
    observable::throw::<i32, _>(String::from("error")).subscribe_all(
      move |_| *c_hits.rc_deref_mut() += 1,
      move |e: String| c_seen.rc_deref_mut().push_str(&e),
      move || c_completed.set(true),
    );
    assert_eq!(*hits.rc_deref(), 0);
    assert!(!completed.get());
    assert_eq!(*seen.rc_deref(), "error");
  }

  #[test]
  fn empty_completes_without_values() {
    let hits = MutArc::own(0);
    let completed = CellArc::own(false);
    let c_hits = hits.clone();
    let c_completed = completed.clone();
    observable::empty::<i32>()
      .subscribe_complete(move |_| *c_hits.rc_deref_mut() += 1, move || c_completed.set(true));
    assert_eq!(*hits.rc_deref(), 0);
    assert!(completed.get());
  }

  #[test]
  fn never_stays_silent() {
    observable::never::<i32, ()>()
      .subscribe_complete(|_| panic!("value"), || panic!("complete"));
  }
}
