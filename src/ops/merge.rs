use crate::observable::Observable;
use crate::observer::Observer;
use crate::rc::{MutArc, RcDeref, RcDerefMut};
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike};

/// Combine two observables into one by merging their emissions. Chaining
/// `merge` merges any number of sources.
///
/// ```
/// use rx_core::prelude::*;
///
/// let numbers = Subject::<i32, ()>::new();
/// let even = numbers.clone().filter(|v| v % 2 == 0);
/// let odd = numbers.clone().filter(|v| v % 2 != 0);
/// even.merge(odd).subscribe(|v| println!("{} ", v));
/// ```
#[derive(Clone)]
pub struct MergeOp<S1, S2> {
  pub(crate) source1: S1,
  pub(crate) source2: S2,
}

impl<S1, S2> Observable for MergeOp<S1, S2>
where
  S1: Observable,
  S2: Observable<Item = S1::Item, Err = S1::Err>,
{
  type Item = S1::Item;
  type Err = S1::Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = S1::Item, Err = S1::Err> + Send + 'static,
  {
    let MergeOp { source1, source2 } = self;
    let Subscriber { observer, subscription } = subscriber;
    let state = MutArc::own(MergeState { observer: Some(observer), pending_complete: 2 });

    // Every source gets a child subscription, so one side completing cannot
    // tear its sibling down; an error or disposal closes the parent and with
    // it both children.
    let first = SharedSubscription::default();
    subscription.add(first.clone());
    source1.actual_subscribe(Subscriber {
      observer: MergeObserver { state: state.clone(), subscription: subscription.clone() },
      subscription: first,
    });

    let second = SharedSubscription::default();
    subscription.add(second.clone());
    source2.actual_subscribe(Subscriber {
      observer: MergeObserver { state, subscription: subscription.clone() },
      subscription: second,
    });

    subscription
  }
}

struct MergeState<O> {
  observer: Option<O>,
  pending_complete: usize,
}

pub struct MergeObserver<O> {
  state: MutArc<MergeState<O>>,
  subscription: SharedSubscription,
}

impl<O, Item, Err> Observer for MergeObserver<O>
where
  O: Observer<Item = Item, Err = Err>,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    // Forwarding under the state lock serializes concurrent sources.
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    let failed = {
      let mut state = self.state.rc_deref_mut();
      state.pending_complete = 0;
      state.observer.take()
    };
    if let Some(mut observer) = failed {
      observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.pending_complete == 0 {
        return;
      }
      state.pending_complete -= 1;
      if state.pending_complete == 0 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_stopped(&self) -> bool { self.state.rc_deref().observer.is_none() }
}
