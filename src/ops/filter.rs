use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::{complete_proxy_impl, error_proxy_impl, is_stopped_proxy_impl};

#[derive(Clone)]
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) filter: F,
}

impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let FilterOp { source, filter } = self;
    source.actual_subscribe(Subscriber {
      observer: FilterObserver { observer: subscriber.observer, filter },
      subscription: subscriber.subscription,
    })
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  filter: F,
}

impl<O, F, Item, Err> Observer for FilterObserver<O, F>
where
  O: Observer<Item = Item, Err = Err>,
  F: FnMut(&Item) -> bool,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_stopped_proxy_impl!(observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn odd_even_split() {
    let even = MutArc::own(vec![]);
    let c_even = even.clone();
    observable::from_iter(0..10)
      .filter(|v| v % 2 == 0)
      .subscribe(move |v| c_even.rc_deref_mut().push(v));
    assert_eq!(*even.rc_deref(), vec![0, 2, 4, 6, 8]);
  }

  #[test]
  fn terminal_passes_through() {
    let completed = CellArc::own(false);
    let c_completed = completed.clone();
    observable::from_iter(0..4)
      .filter(|_| false)
      .subscribe_complete(|_: i32| panic!("filtered out"), move || c_completed.set(true));
    assert!(completed.get());
  }
}
