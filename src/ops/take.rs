use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike};

#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S: Observable> Observable for TakeOp<S> {
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let TakeOp { source, count } = self;
    let subscription = subscriber.subscription.clone();
    source.actual_subscribe(Subscriber {
      observer: TakeObserver {
        observer: subscriber.observer,
        remaining: count,
        done: false,
        subscription,
      },
      subscription: subscriber.subscription,
    })
  }
}

pub struct TakeObserver<O> {
  observer: O,
  remaining: usize,
  done: bool,
  subscription: SharedSubscription,
}

impl<O, Item, Err> Observer for TakeObserver<O>
where
  O: Observer<Item = Item, Err = Err>,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if self.done || self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.done = true;
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn error(&mut self, err: Err) {
    if !self.done {
      self.done = true;
      self.observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  // An upstream completion arriving after the nth value is a benign no-op.
  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_stopped(&self) -> bool { self.done || self.observer.is_stopped() }
}
