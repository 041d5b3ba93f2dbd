use std::time::Duration;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::rc::MutArc;
use crate::scheduler::Scheduler;
use crate::subscriber::Subscriber;
use crate::subscription::{SerialSubscription, SharedSubscription, SubscriptionLike};

/// Emits an ascending counter every `period` on `scheduler`, forever. Each
/// tick re-arms itself through a serial slot, so unsubscribing cancels the
/// pending tick and ends the chain.
pub fn interval<SD>(period: Duration, scheduler: SD) -> ObservableInterval<SD> {
  ObservableInterval { period, scheduler }
}

#[derive(Clone)]
pub struct ObservableInterval<SD> {
  period: Duration,
  scheduler: SD,
}

impl<SD> Observable for ObservableInterval<SD>
where
  SD: Scheduler + Clone + Send + 'static,
{
  type Item = usize;
  type Err = ();
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = usize, Err = ()> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let slot = SerialSubscription::default();
    subscription.add(slot.clone());
    let observer = MutArc::own(Some(subscriber));
    schedule_tick(self.scheduler, self.period, observer, slot, 0);
    subscription
  }
}

fn schedule_tick<SD, O>(
  scheduler: SD,
  period: Duration,
  observer: MutArc<Option<O>>,
  slot: SerialSubscription,
  count: usize,
) where
  SD: Scheduler + Clone + Send + 'static,
  O: Observer<Item = usize, Err = ()> + Send + 'static,
{
  let c_slot = slot.clone();
  let handle = scheduler.clone().schedule(
    move |task_subscription, (mut observer, slot): (MutArc<Option<O>>, SerialSubscription)| {
      if task_subscription.is_closed() || observer.is_stopped() {
        return;
      }
      observer.next(count);
      schedule_tick(scheduler, period, observer, slot, count + 1);
    },
    Some(period),
    (observer, slot),
  );
  c_slot.set(handle);
}

/// Emits `0` and completes, `delay` after subscription. The idiomatic
/// timeout trigger: `source.take_until(observable::timer(d, scheduler))`.
pub fn timer<SD>(delay: Duration, scheduler: SD) -> ObservableTimer<SD> {
  ObservableTimer { delay, scheduler }
}

#[derive(Clone)]
pub struct ObservableTimer<SD> {
  delay: Duration,
  scheduler: SD,
}

impl<SD> Observable for ObservableTimer<SD>
where
  SD: Scheduler + Send + 'static,
{
  type Item = usize;
  type Err = ();
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = usize, Err = ()> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let handle = self.scheduler.schedule(
      move |task_subscription, mut subscriber: Subscriber<O>| {
        if !task_subscription.is_closed() {
          subscriber.next(0);
          subscriber.complete();
        }
      },
      Some(self.delay),
      subscriber,
    );
    subscription.add(handle);
    subscription
  }
}
