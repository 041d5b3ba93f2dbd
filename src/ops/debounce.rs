use std::time::Duration;

use crate::observable::Observable;
use crate::observer::Observer;
use crate::rc::{MutArc, RcDerefMut};
use crate::scheduler::Scheduler;
use crate::subscriber::Subscriber;
use crate::subscription::{SerialSubscription, SubscriptionLike};

/// Trailing-edge throttle: a value is emitted once the source stayed silent
/// for `duration`. Every incoming value bumps a version counter and re-arms
/// the timer through a serial slot; only the newest version fires.
/// Completion flushes the pending value, an error discards it.
#[derive(Clone)]
pub struct DebounceOp<S, SD> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for DebounceOp<S, SD>
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
    let DebounceOp { source, duration, scheduler } = self;
    let Subscriber { observer, subscription } = subscriber;
    let slot = SerialSubscription::default();
    subscription.add(slot.clone());
    source.actual_subscribe(Subscriber {
      observer: DebounceObserver {
        observer: MutArc::own(Some(observer)),
        state: MutArc::own(DebounceState { value: None, version: 0 }),
        slot,
        duration,
        scheduler,
      },
      subscription,
    })
  }
}

struct DebounceState<Item> {
  value: Option<Item>,
  version: usize,
}

pub struct DebounceObserver<O, SD, Item> {
  observer: MutArc<Option<O>>,
  state: MutArc<DebounceState<Item>>,
  slot: SerialSubscription,
  duration: Duration,
  scheduler: SD,
}

impl<O, SD, Item, Err> Observer for DebounceObserver<O, SD, Item>
where
  O: Observer<Item = Item, Err = Err> + Send + 'static,
  SD: Scheduler,
  Item: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let current = {
      let mut state = self.state.rc_deref_mut();
      state.value = Some(value);
      state.version += 1;
      state.version
    };
    let handle = self.scheduler.schedule(
      move |task_subscription, (mut observer, state): (MutArc<Option<O>>, MutArc<DebounceState<Item>>)| {
        if task_subscription.is_closed() {
          return;
        }
        let fired = {
          let mut state = state.rc_deref_mut();
          if state.version == current { state.value.take() } else { None }
        };
        if let Some(value) = fired {
          observer.next(value);
        }
      },
      Some(self.duration),
      (self.observer.clone(), self.state.clone()),
    );
    self.slot.set(handle);
  }

  fn error(&mut self, err: Err) {
    {
      let mut state = self.state.rc_deref_mut();
      state.version += 1;
      state.value = None;
    }
    self.observer.error(err);
  }

  fn complete(&mut self) {
    let pending = {
      let mut state = self.state.rc_deref_mut();
      state.version += 1;
      state.value.take()
    };
    if let Some(value) = pending {
      self.observer.next(value);
    }
    self.observer.complete();
  }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};
  use futures::executor::ThreadPool;
  use std::thread::sleep;
  use std::time::Duration;

  #[test]
  fn emits_only_the_settled_value() {
    let pool = ThreadPool::new().unwrap();
    let emitted = MutArc::own(vec![]);
    let c_emitted = emitted.clone();

    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .debounce(Duration::from_millis(40), pool)
      .subscribe(move |v| c_emitted.rc_deref_mut().push(v));

    source.next(1);
    source.next(2);
    source.next(3);
    sleep(Duration::from_millis(120));
    source.next(4);
    sleep(Duration::from_millis(120));

    assert_eq!(*emitted.rc_deref(), vec![3, 4]);
  }

  #[test]
  fn completion_flushes_pending_value() {
    let pool = ThreadPool::new().unwrap();
    let emitted = MutArc::own(vec![]);
    let completed = CellArc::own(false);
    let c_emitted = emitted.clone();
    let c_completed = completed.clone();

    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .debounce(Duration::from_millis(200), pool)
      .subscribe_complete(
        move |v| c_emitted.rc_deref_mut().push(v),
        move || c_completed.set(true),
      );

    source.next(9);
    source.complete();
    assert_eq!(*emitted.rc_deref(), vec![9]);
    assert!(completed.get());
  }

  #[test]
  fn error_discards_pending_value() {
    let pool = ThreadPool::new().unwrap();
    let emitted = MutArc::own(Vec::<i32>::new());
    let errored = CellArc::own(false);
    let c_emitted = emitted.clone();
    let c_errored = errored.clone();

    let mut source = Subject::<i32, &'static str>::new();
    source
      .clone()
      .debounce(Duration::from_millis(50), pool)
      .subscribe_err(
        move |v| c_emitted.rc_deref_mut().push(v),
        move |_| c_errored.set(true),
      );

    source.next(1);
    source.error("boom");
    sleep(Duration::from_millis(120));
    assert!(emitted.rc_deref().is_empty());
    assert!(errored.get());
  }
}
