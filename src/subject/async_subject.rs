use std::sync::{Arc, Mutex};

use super::{
  BoxObserver, ObserverTable, RefObserver, SubjectState, SubjectSubscription,
  Subscribers,
};
use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

struct AsyncInner<Item, Err> {
  state: SubjectState<Err>,
  value: Option<Item>,
  subscribers: Subscribers<Item, Err>,
}

impl<Item, Err> ObserverTable<Item, Err> for AsyncInner<Item, Err> {
  #[inline]
  fn table(&mut self) -> &mut Subscribers<Item, Err> { &mut self.subscribers }
}

/// Caches only the last value seen and emits it (followed by `complete`)
/// once the subject completes. Subscribers attaching after completion get
/// the same replay; an error discards the cached value.
pub struct AsyncSubject<Item, Err> {
  inner: Arc<Mutex<AsyncInner<Item, Err>>>,
}

impl<Item, Err> AsyncSubject<Item, Err> {
  pub fn new() -> Self {
    AsyncSubject {
      inner: Arc::new(Mutex::new(AsyncInner {
        state: SubjectState::Forwarding,
        value: None,
        subscribers: Subscribers::default(),
      })),
    }
  }
}

impl<Item, Err> Default for AsyncSubject<Item, Err> {
  #[inline]
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for AsyncSubject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { AsyncSubject { inner: self.inner.clone() } }
}

impl<Item, Err> Observer for AsyncSubject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let mut inner = self.inner.lock().unwrap();
    if inner.state.is_forwarding() {
      inner.value = Some(value);
    }
  }

  fn error(&mut self, err: Err) {
    let drained = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
      inner.state = SubjectState::Error(err.clone());
      inner.value = None;
      inner.subscribers.drain()
    };
    for observer in &drained {
      observer.lock().unwrap().error(err.clone());
    }
  }

  fn complete(&mut self) {
    let (drained, value) = {
      let mut inner = self.inner.lock().unwrap();
      if !inner.state.is_forwarding() {
        return;
      }
      inner.state = SubjectState::Completed;
      (inner.subscribers.drain(), inner.value.clone())
    };
    for observer in &drained {
      let mut observer = observer.lock().unwrap();
      if let Some(value) = value.clone() {
        observer.next(value);
      }
      observer.complete();
    }
  }

  fn is_stopped(&self) -> bool {
    !self.inner.lock().unwrap().state.is_forwarding()
  }
}

impl<Item, Err> Observable for AsyncSubject<Item, Err>
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

    let replay: Result<Option<Item>, Err> = match &inner.state {
      SubjectState::Error(err) => Err(err.clone()),
      _ => Ok(inner.value.clone()),
    };
    drop(inner);

    match replay {
      Ok(value) => {
        if let Some(value) = value {
          subscriber.next(value);
        }
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
  fn emits_last_value_at_completion() {
    let early = MutArc::own(vec![]);
    let late = MutArc::own(vec![]);
    let c_early = early.clone();
    let c_late = late.clone();

    let mut subject = AsyncSubject::<i32, ()>::new();
    subject.next(1);
    subject.next(2);
    subject.next(3);

    subject
      .clone()
      .subscribe(move |v| c_early.rc_deref_mut().push(v));
    assert!(early.rc_deref().is_empty());

    subject.complete();
    assert_eq!(*early.rc_deref(), vec![3]);

    subject
      .clone()
      .subscribe(move |v| c_late.rc_deref_mut().push(v));
    assert_eq!(*late.rc_deref(), vec![3]);
  }

  #[test]
  fn empty_completion_only_completes() {
    let completed = CellArc::own(false);
    let c_completed = completed.clone();
    let mut subject = AsyncSubject::<i32, ()>::new();
    subject
      .clone()
      .subscribe_complete(|_| panic!("no value expected"), move || c_completed.set(true));
    subject.complete();
    assert!(completed.get());
  }

  #[test]
  fn error_discards_cached_value() {
    let mut subject = AsyncSubject::<i32, &'static str>::new();
    subject.next(42);
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
