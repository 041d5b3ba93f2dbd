use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::rc::CellArc;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;
use crate::{complete_proxy_impl, error_proxy_impl, is_stopped_proxy_impl};

#[derive(Clone)]
pub struct SkipUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S, N> Observable for SkipUntilOp<S, N>
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
    let SkipUntilOp { source, notifier } = self;
    let Subscriber { observer, subscription } = subscriber;
    let taking = CellArc::own(false);

    let notifier_subscription = SharedSubscription::default();
    subscription.add(notifier_subscription.clone());
    notifier.actual_subscribe(Subscriber {
      observer: SkipUntilNotifierObserver {
        taking: taking.clone(),
        _hint: TypeHint::new(),
      },
      subscription: notifier_subscription,
    });

    source.actual_subscribe(Subscriber {
      observer: SkipUntilObserver { observer, taking },
      subscription,
    })
  }
}

pub struct SkipUntilObserver<O> {
  observer: O,
  taking: CellArc<bool>,
}

impl<O, Item, Err> Observer for SkipUntilObserver<O>
where
  O: Observer<Item = Item, Err = Err>,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if self.taking.get() {
      self.observer.next(value);
    }
  }

  error_proxy_impl!(Err, observer);
  complete_proxy_impl!(observer);
  is_stopped_proxy_impl!(observer);
}

pub struct SkipUntilNotifierObserver<NotifyItem, NotifyErr> {
  taking: CellArc<bool>,
  _hint: TypeHint<(NotifyItem, NotifyErr)>,
}

impl<NotifyItem, NotifyErr> Observer for SkipUntilNotifierObserver<NotifyItem, NotifyErr> {
  type Item = NotifyItem;
  type Err = NotifyErr;

  fn next(&mut self, _value: NotifyItem) { self.taking.set(true); }

  fn error(&mut self, _err: NotifyErr) { self.taking.set(true); }

  fn complete(&mut self) { self.taking.set(true); }

  fn is_stopped(&self) -> bool { self.taking.get() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::rc::{MutArc, RcDeref, RcDerefMut};

  #[test]
  fn drops_values_until_trigger() {
    let emitted = MutArc::own(vec![]);
    let c_emitted = emitted.clone();

    let mut notifier = Subject::<(), ()>::new();
    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .skip_until(notifier.clone())
      .subscribe(move |v| c_emitted.rc_deref_mut().push(v));

    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);
    source.next(4);
    source.complete();

    assert_eq!(*emitted.rc_deref(), vec![3, 4]);
  }

  #[test]
  fn completion_passes_through_while_skipping() {
    let completed = CellArc::own(false);
    let c_completed = completed.clone();
    let notifier = Subject::<(), ()>::new();
    let mut source = Subject::<i32, ()>::new();
    source
      .clone()
      .skip_until(notifier)
      .subscribe_complete(|_| panic!("still skipping"), move || c_completed.set(true));
    source.next(1);
    source.complete();
    assert!(completed.get());
  }
}
