use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

/// Emits every item of `iter`, then completes. The iterator is polled for
/// cancellation between items, so an unsubscribed or self-terminated chain
/// stops the drain early.
pub fn from_iter<I>(iter: I) -> ObservableFromIter<I>
where
  I: IntoIterator,
{
  ObservableFromIter(iter)
}

#[derive(Clone)]
pub struct ObservableFromIter<I>(I);

impl<I> Observable for ObservableFromIter<I>
where
  I: IntoIterator,
  I::Item: 'static,
{
  type Item = I::Item;
  type Err = ();
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = I::Item, Err = ()> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let mut subscriber = subscriber;
    for value in self.0 {
      if subscriber.is_stopped() {
        break;
      }
      subscriber.next(value);
    }
    if !subscriber.is_stopped() {
      subscriber.complete();
    }
    subscription
  }
}
