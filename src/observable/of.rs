use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

/// Emits a single value, then completes.
pub fn of<Item>(value: Item) -> ObservableOf<Item> {
  ObservableOf(value)
}

#[derive(Clone)]
pub struct ObservableOf<Item>(Item);

impl<Item: 'static> Observable for ObservableOf<Item> {
  type Item = Item;
  type Err = ();
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = ()> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let mut subscriber = subscriber;
    subscriber.next(self.0);
    subscriber.complete();
    subscription
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn single_value_then_complete() {
    let collected = MutArc::own(vec![]);
    let completed = CellArc::own(false);
    let c_collected = collected.clone();
    let c_completed = completed.clone();
    observable::of(42).subscribe_complete(
      move |v| c_collected.rc_deref_mut().push(v),
      move || c_completed.set(true),
    );
    assert_eq!(*collected.rc_deref(), vec![42]);
    assert!(completed.get());
  }
}
