use std::sync::{Arc, Mutex};

use super::{
  BoxObserver, ObserverTable, RefObserver, Snapshot, SubjectState,
  SubjectSubscription, Subscribers,
};
use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

pub(crate) struct PublishInner<Item, Err> {
  state: SubjectState<Err>,
  subscribers: Subscribers<Item, Err>,
}

impl<Item, Err> ObserverTable<Item, Err> for PublishInner<Item, Err> {
  #[inline]
  fn table(&mut self) -> &mut Subscribers<Item, Err> { &mut self.subscribers }
}

/// Memory-less multicast: late subscribers see only future events. A subject
/// that already terminated replays the terminal event synchronously to every
/// late subscriber.
pub struct Subject<Item, Err> {
  inner: Arc<Mutex<PublishInner<Item, Err>>>,
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self {
    Subject {
      inner: Arc::new(Mutex::new(PublishInner {
        state: SubjectState::Forwarding,
        subscribers: Subscribers::default(),
      })),
    }
  }

  /// Number of currently attached observers.
  pub fn subscriber_count(&self) -> usize {
    self.inner.lock().unwrap().subscribers.live_count()
  }
}

impl<Item, Err> Default for Subject<Item, Err> {
  #[inline]
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Subject { inner: self.inner.clone() } }
}

impl<Item, Err> Observer for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let snapshot = {
      let inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
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

impl<Item, Err> Observable for Subject<Item, Err>
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
      let observer: RefObserver<Item, Err> =
        Arc::new(Mutex::new(Box::new(subscriber) as BoxObserver<Item, Err>));
      let handle = SubjectSubscription::new(&self.inner, &observer);
      inner.subscribers.attach(observer);
      drop(inner);
      subscription.add(handle);
      return subscription;
    }
    let replay_error = match &inner.state {
      SubjectState::Error(err) => Some(err.clone()),
      _ => None,
    };
    drop(inner);

    match replay_error {
      Some(err) => subscriber.error(err),
      None => subscriber.complete(),
    }
    subscription
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn base_data_flow() {
    let collected = MutArc::own(vec![]);
    let c_collected = collected.clone();
    let mut subject = Subject::<i32, ()>::new();
    subject
      .clone()
      .subscribe(move |v| c_collected.rc_deref_mut().push(v * 2));
    subject.next(1);
    subject.next(2);
    assert_eq!(*collected.rc_deref(), vec![2, 4]);
  }

  #[test]
  fn late_subscriber_sees_only_future_events() {
    let first = MutArc::own(vec![]);
    let second = MutArc::own(vec![]);
    let c_first = first.clone();
    let c_second = second.clone();

    let mut subject = Subject::<i32, ()>::new();
    subject
      .clone()
      .subscribe(move |v| c_first.rc_deref_mut().push(v));
    subject.next(1);
    subject.next(2);

    subject
      .clone()
      .subscribe(move |v| c_second.rc_deref_mut().push(v));
    subject.next(3);
    subject.complete();

    assert_eq!(*first.rc_deref(), vec![1, 2, 3]);
    assert_eq!(*second.rc_deref(), vec![3]);
  }

  #[test]
  fn terminal_replay_for_late_subscriber() {
    let mut subject = Subject::<i32, ()>::new();
    subject.complete();

    let completed = CellArc::own(false);
    let c_completed = completed.clone();
    subject
      .clone()
      .subscribe_complete(|_| {}, move || c_completed.set(true));
    assert!(completed.get());

    let mut failed = Subject::<i32, &'static str>::new();
    failed.error("boom");
    let seen = MutArc::own(String::new());
    let c_seen = seen.clone();
    failed
      .clone()
      .subscribe_err(|_| {}, move |e: &'static str| c_seen.rc_deref_mut().push_str(e));
    assert_eq!(*seen.rc_deref(), "boom");
  }

  #[test]
  fn unsubscribe_detaches_observer() {
    let hits = MutArc::own(0);
    let c_hits = hits.clone();
    let mut subject = Subject::<i32, ()>::new();
    let mut handle = subject
      .clone()
      .subscribe(move |v| *c_hits.rc_deref_mut() += v);
    subject.next(1);
    handle.unsubscribe();
    subject.next(100);
    assert_eq!(*hits.rc_deref(), 1);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn tombstone_slot_is_reused() {
    let mut subject = Subject::<i32, ()>::new();
    let mut first = subject.clone().subscribe(|_| {});
    subject.clone().subscribe(|_| {});
    first.unsubscribe();
    assert_eq!(subject.subscriber_count(), 1);
    subject.clone().subscribe(|_| {});
    assert_eq!(subject.subscriber_count(), 2);
    subject.next(1);
  }

  #[test]
  fn events_after_terminal_are_dropped() {
    let hits = MutArc::own(0);
    let completions = MutArc::own(0);
    let c_hits = hits.clone();
    let c_completions = completions.clone();
    let mut subject = Subject::<i32, ()>::new();
    subject.clone().subscribe_complete(
      move |_| *c_hits.rc_deref_mut() += 1,
      move || *c_completions.rc_deref_mut() += 1,
    );
    subject.next(1);
    subject.complete();
    subject.next(2);
    subject.complete();
    assert_eq!(*hits.rc_deref(), 1);
    assert_eq!(*completions.rc_deref(), 1);
    assert!(subject.is_stopped());
  }
}
