use std::time::{Duration, Instant};

use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::{complete_proxy_impl, error_proxy_impl, is_stopped_proxy_impl};

/// Leading-edge rate limit: a value is forwarded only if at least `window`
/// elapsed since the last forwarded value, otherwise it is dropped.
#[derive(Clone)]
pub struct ThrottleTimeOp<S> {
  pub(crate) source: S,
  pub(crate) window: Duration,
}

impl<S: Observable> Observable for ThrottleTimeOp<S> {
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let ThrottleTimeOp { source, window } = self;
    source.actual_subscribe(Subscriber {
      observer: ThrottleTimeObserver { observer: subscriber.observer, window, due: None },
      subscription: subscriber.subscription,
    })
  }
}

pub struct ThrottleTimeObserver<O> {
  observer: O,
  window: Duration,
  due: Option<Instant>,
}

impl<O, Item, Err> Observer for ThrottleTimeObserver<O>
where
  O: Observer<Item = Item, Err = Err>,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let now = Instant::now();
    if self.due.map_or(true, |due| now >= due) {
      self.due = Some(now + self.window);
      self.observer.next(value);
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
  use std::thread::sleep;
  use std::time::Duration;

  #[test]
  fn drops_values_inside_the_window() {
    let emitted = MutArc::own(vec![]);
    let c_emitted = emitted.clone();
    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .throttle_time(Duration::from_millis(40))
      .subscribe(move |v| c_emitted.rc_deref_mut().push(v));

    source.next(1);
    source.next(2);
    source.next(3);
    sleep(Duration::from_millis(60));
    source.next(4);
    source.next(5);

    assert_eq!(*emitted.rc_deref(), vec![1, 4]);
  }

  #[test]
  fn zero_window_forwards_everything() {
    let emitted = MutArc::own(vec![]);
    let c_emitted = emitted.clone();
    observable::from_iter(0..4)
      .throttle_time(Duration::from_millis(0))
      .subscribe(move |v| c_emitted.rc_deref_mut().push(v));
    assert_eq!(*emitted.rc_deref(), vec![0, 1, 2, 3]);
  }
}
