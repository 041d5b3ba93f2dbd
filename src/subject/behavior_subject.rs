use std::sync::{Arc, Mutex};

use super::{
  BoxObserver, ObserverTable, RefObserver, Snapshot, SubjectState,
  SubjectSubscription, Subscribers,
};
use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

struct BehaviorInner<Item, Err> {
  state: SubjectState<Err>,
  value: Item,
  subscribers: Subscribers<Item, Err>,
}

impl<Item, Err> ObserverTable<Item, Err> for BehaviorInner<Item, Err> {
  #[inline]
  fn table(&mut self) -> &mut Subscribers<Item, Err> { &mut self.subscribers }
}

/// Multicast that latches the most recent value. A subscriber attaching
/// while the subject forwards receives the latest value first; after
/// completion it receives the latest value and `complete`; after an error
/// only the error.
pub struct BehaviorSubject<Item, Err> {
  inner: Arc<Mutex<BehaviorInner<Item, Err>>>,
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    BehaviorSubject {
      inner: Arc::new(Mutex::new(BehaviorInner {
        state: SubjectState::Forwarding,
        value: initial,
        subscribers: Subscribers::default(),
      })),
    }
  }
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { BehaviorSubject { inner: self.inner.clone() } }
}

impl<Item, Err> Observer for BehaviorSubject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let snapshot = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
      inner.value = value.clone();
      inner.subscribers.snapshot()
    };
    let mut stopped = Snapshot::new();
    for observer in &snapshot {
      let mut guard = observer.lock().unwrap();
      guard.next(value.clone());
      if guard.is_stopped() {
        stopped.push(observer.clone());
      }
    }
    if !stopped.is_empty() {
      self
        .inner
        .lock()
        .unwrap()
        .subscribers
        .remove_stopped(&stopped);
    }
  }

  fn error(&mut self, err: Err) {
    let drained = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
      inner.state = SubjectState::Error(err.clone());
      inner.subscribers.drain()
    };
    for observer in &drained {
      observer.lock().unwrap().error(err.clone());
    }
  }

  fn complete(&mut self) {
    let drained = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
      inner.state = SubjectState::Completed;
      inner.subscribers.drain()
    };
    for observer in &drained {
      observer.lock().unwrap().complete();
    }
  }

  fn is_stopped(&self) -> bool {
    !self.inner.lock().unwrap().state.is_forwarding()
  }
}

impl<Item, Err> Observable for BehaviorSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let mut subscriber = subscriber;

    let mut inner = self.inner.lock().unwrap();
    if inner.state.is_forwarding() {
      let latest = inner.value.clone();
      let observer: RefObserver<Item, Err> =
        Arc::new(Mutex::new(Box::new(subscriber) as BoxObserver<Item, Err>));
      let handle = SubjectSubscription::new(&self.inner, &observer);
      inner.subscribers.attach(observer.clone());
      drop(inner);
      subscription.add(handle);
      // The latch is replayed to the new observer only; a broadcast racing
      // with this attach is ordered by the slot mutex.
      observer.lock().unwrap().next(latest);
      return subscription;
    }

    let replay: Result<Item, Err> = match &inner.state {
      SubjectState::Error(err) => Err(err.clone()),
      _ => Ok(inner.value.clone()),
    };
    drop(inner);

    match replay {
      Ok(latest) => {
        subscriber.next(latest);
        subscriber.complete();
      }
      Err(err) => subscriber.error(err),
    }
    subscription
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn replays_latest_value_on_subscribe() {
    let first = MutArc::own(vec![]);
    let second = MutArc::own(vec![]);
    let c_first = first.clone();
    let c_second = second.clone();

    let mut subject = BehaviorSubject::<i32, ()>::new(0);
    subject
      .clone()
      .subscribe(move |v| c_first.rc_deref_mut().push(v));
    assert_eq!(*first.rc_deref(), vec![0]);

    subject.next(7);
    subject
      .clone()
      .subscribe(move |v| c_second.rc_deref_mut().push(v));
    assert_eq!(*second.rc_deref(), vec![7]);

    subject.complete();
    assert_eq!(*first.rc_deref(), vec![0, 7]);
    assert_eq!(*second.rc_deref(), vec![7]);
  }

  #[test]
  fn completed_subject_replays_latest_then_completes() {
    let mut subject = BehaviorSubject::<i32, ()>::new(1);
    subject.next(5);
    subject.complete();

    let collected = MutArc::own(vec![]);
    let completed = CellArc::own(false);
    let c_collected = collected.clone();
    let c_completed = completed.clone();
    subject.clone().subscribe_complete(
      move |v| c_collected.rc_deref_mut().push(v),
      move || c_completed.set(true),
    );
    assert_eq!(*collected.rc_deref(), vec![5]);
    assert!(completed.get());
  }

  #[test]
  fn failed_subject_replays_only_the_error() {
    let mut subject = BehaviorSubject::<i32, &'static str>::new(1);
    subject.error("boom");

    let hits = MutArc::own(0);
    let seen = MutArc::own("");
    let c_hits = hits.clone();
    let c_seen = seen.clone();
    subject.clone().subscribe_err(
      move |_| *c_hits.rc_deref_mut() += 1,
      move |e| *c_seen.rc_deref_mut() = e,
    );
    assert_eq!(*hits.rc_deref(), 0);
    assert_eq!(*seen.rc_deref(), "boom");
  }
}
