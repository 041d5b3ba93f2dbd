use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::{complete_proxy_impl, error_proxy_impl, is_stopped_proxy_impl};

/// Removes duplicate-sequenced values, e.g. `1,2,2,3,1` becomes `1,2,3,1`.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<S> Observable for DistinctUntilChangedOp<S>
where
  S: Observable,
  S::Item: PartialEq + Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    self.source.actual_subscribe(Subscriber {
      observer: DistinctUntilChangedObserver { observer: subscriber.observer, last: None },
      subscription: subscriber.subscription,
    })
  }
}

pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item, Err> Observer for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item = Item, Err = Err>,
  Item: PartialEq + Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if self.last.as_ref().map_or(true, |last| last != &value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_stopped_proxy_impl!(observer);
}
