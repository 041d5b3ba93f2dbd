use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::rc::{CellArc, MutArc};
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike};

#[derive(Clone)]
pub struct TakeUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S, N> Observable for TakeUntilOp<S, N>
where
  S: Observable,
  N: Observable,
  N::Item: Send + 'static,
  N::Err: Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let TakeUntilOp { source, notifier } = self;
    let Subscriber { observer, subscription } = subscriber;
    // The downstream observer is reached from both subscriptions, the
    // notifier side only ever completes it.
    let observer = MutArc::own(Some(observer));
    let terminated = CellArc::own(false);

    // The notifier gets its own child subscription: its terminal events set
    // the flag and must not tear the main chain down.
    let notifier_subscription = SharedSubscription::default();
    subscription.add(notifier_subscription.clone());
    notifier.actual_subscribe(Subscriber {
      observer: TakeUntilNotifierObserver {
        terminated: terminated.clone(),
        _hint: TypeHint::new(),
      },
      subscription: notifier_subscription,
    });

    source.actual_subscribe(Subscriber {
      observer: TakeUntilObserver {
        observer,
        terminated,
        done: false,
        subscription: subscription.clone(),
      },
      subscription,
    })
  }
}

pub struct TakeUntilObserver<O> {
  observer: MutArc<Option<O>>,
  terminated: CellArc<bool>,
  done: bool,
  subscription: SharedSubscription,
}

impl<O, Item, Err> Observer for TakeUntilObserver<O>
where
  O: Observer<Item = Item, Err = Err>,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if !self.terminated.get() {
      self.observer.next(value);
    } else if !self.done {
      // First source event past the trigger closes the stream.
      self.done = true;
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn error(&mut self, err: Err) {
    if !self.done {
      self.done = true;
      self.terminated.set(true);
      self.observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.terminated.set(true);
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_stopped(&self) -> bool { self.done || self.observer.is_stopped() }
}

pub struct TakeUntilNotifierObserver<NotifyItem, NotifyErr> {
  terminated: CellArc<bool>,
  _hint: TypeHint<(NotifyItem, NotifyErr)>,
}

impl<NotifyItem, NotifyErr> Observer for TakeUntilNotifierObserver<NotifyItem, NotifyErr> {
  type Item = NotifyItem;
  type Err = NotifyErr;

  fn next(&mut self, _value: NotifyItem) { self.terminated.set(true); }

  fn error(&mut self, _err: NotifyErr) { self.terminated.set(true); }

  fn complete(&mut self) { self.terminated.set(true); }

  fn is_stopped(&self) -> bool { self.terminated.get() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};
  use bencher::{benchmark_group, Bencher};

  #[test]
  fn base_function() {
    let last_next_arg = MutArc::own(None);
    let next_count = MutArc::own(0);
    let completed_count = MutArc::own(0);
    let c_last_next_arg = last_next_arg.clone();
    let c_next_count = next_count.clone();
    let c_completed_count = completed_count.clone();

    let mut notifier = Subject::<(), ()>::new();
    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .take_until(notifier.clone())
      .subscribe_complete(
        move |i| {
          *c_last_next_arg.rc_deref_mut() = Some(i);
          *c_next_count.rc_deref_mut() += 1;
        },
        move || {
          *c_completed_count.rc_deref_mut() += 1;
        },
      );
    source.next(5);
    notifier.next(());
    source.next(6);
    notifier.complete();
    source.complete();

    assert_eq!(*next_count.rc_deref(), 1);
    assert_eq!(*last_next_arg.rc_deref(), Some(5));
    assert_eq!(*completed_count.rc_deref(), 1);
  }

  #[test]
  fn trigger_completion_alone_terminates() {
    let completed = MutArc::own(0);
    let c_completed = completed.clone();
    let mut notifier = Subject::<(), ()>::new();
    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .take_until(notifier.clone())
      .subscribe_complete(|_| {}, move || *c_completed.rc_deref_mut() += 1);

    // A completing notifier arms termination just like a value does.
    notifier.complete();
    source.next(1);
    source.next(2);
    assert_eq!(*completed.rc_deref(), 1);
  }

  #[test]
  fn source_error_passes_through() {
    let seen = MutArc::own("");
    let c_seen = seen.clone();
    let notifier = Subject::<(), ()>::new();
    let mut source = Subject::<i32, &'static str>::new();
    source
      .clone()
      .take_until(notifier)
      .subscribe_err(|_| {}, move |e| *c_seen.rc_deref_mut() = e);
    source.error("boom");
    assert_eq!(*seen.rc_deref(), "boom");
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_take_until);

  fn bench_take_until(b: &mut Bencher) { b.iter(base_function); }
}
