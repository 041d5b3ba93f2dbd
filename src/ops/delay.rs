use std::time::Duration;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::rc::MutArc;
use crate::scheduler::Scheduler;
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike};

/// Shifts every value and the completion by `delay` on the supplied
/// scheduler. Errors are delivered synchronously, skipping the queue of
/// pending emissions.
#[derive(Clone)]
pub struct DelayOp<S, SD> {
  pub(crate) source: S,
  pub(crate) delay: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for DelayOp<S, SD>
where
  S: Observable,
  S::Item: Send + 'static,
  SD: Scheduler + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let DelayOp { source, delay, scheduler } = self;
    let Subscriber { observer, subscription } = subscriber;
    let observer = MutArc::own(Some(observer));
    source.actual_subscribe(Subscriber {
      observer: DelayObserver {
        observer,
        delay,
        scheduler,
        subscription: subscription.clone(),
      },
      subscription,
    })
  }
}

pub struct DelayObserver<O, SD> {
  observer: MutArc<Option<O>>,
  delay: Duration,
  scheduler: SD,
  subscription: SharedSubscription,
}

impl<O, SD, Item, Err> Observer for DelayObserver<O, SD>
where
  O: Observer<Item = Item, Err = Err> + Send + 'static,
  SD: Scheduler,
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let handle = self.scheduler.schedule(
      |task_subscription, (mut observer, value): (MutArc<Option<O>>, Item)| {
        if !task_subscription.is_closed() {
          observer.next(value);
        }
      },
      Some(self.delay),
      (self.observer.clone(), value),
    );
    self.subscription.add(handle);
  }

  fn error(&mut self, err: Err) { self.observer.error(err); }

  fn complete(&mut self) {
    let handle = self.scheduler.schedule(
      |task_subscription, mut observer: MutArc<Option<O>>| {
        if !task_subscription.is_closed() {
          observer.complete();
        }
      },
      Some(self.delay),
      self.observer.clone(),
    );
    self.subscription.add(handle);
  }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
