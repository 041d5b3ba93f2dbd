use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::observer::{Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext};
use crate::ops::debounce::DebounceOp;
use crate::ops::delay::DelayOp;
use crate::ops::distinct_until_changed::DistinctUntilChangedOp;
use crate::ops::filter::FilterOp;
use crate::ops::group_by::GroupByOp;
use crate::ops::merge::MergeOp;
use crate::ops::observe_on::ObserveOnOp;
use crate::ops::scan::{ScanInitialOp, ScanOp};
use crate::ops::skip::SkipOp;
use crate::ops::skip_until::SkipUntilOp;
use crate::ops::subscribe_on::SubscribeOnOp;
use crate::ops::take::TakeOp;
use crate::ops::take_until::TakeUntilOp;
use crate::ops::throttle_time::ThrottleTimeOp;
use crate::subject::{AsyncSubject, BehaviorSubject, Subject};
use crate::subscriber::{AutoDetachObserver, Subscriber};
use crate::subscription::{SharedSubscription, SubscriptionLike};

pub mod create;
pub use create::{create, ObservableFn};
pub mod from_iter;
pub use from_iter::{from_iter, ObservableFromIter};
pub mod of;
pub use of::{of, ObservableOf};
pub mod trivial;
pub use trivial::{empty, never, throw, ObservableEmpty, ObservableNever, ObservableThrow};
pub mod interval;
pub use interval::{interval, timer, ObservableInterval, ObservableTimer};
pub mod connectable_observable;
pub use connectable_observable::{ConnectableObservable, ConnectionSubscription};

/// A source of values. Subscribing wires an observer chain up to the source
/// and returns the subscription that cancels the chain.
///
/// `actual_subscribe` is the wiring entry operators call on their upstream;
/// user code goes through the `subscribe_*` family, which installs the
/// protocol-enforcing wrapper around the supplied callbacks.
pub trait Observable: Sized {
  type Item;
  type Err;
  type Unsub: SubscriptionLike + Send + 'static;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static;

  /// Clone a handle to the same source, for subscribing more than once.
  #[inline]
  fn fork(&self) -> Self
  where
    Self: Clone,
  {
    self.clone()
  }

  // ---------------------------------------------------------------- filters

  /// Emit only those values for which `filter` returns `true`.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp { source: self, filter }
  }

  /// Running fold seeded by the first value; every accumulation is emitted.
  #[inline]
  fn scan<B>(self, binary_op: B) -> ScanOp<Self, B>
  where
    B: FnMut(Self::Item, Self::Item) -> Self::Item,
  {
    ScanOp { source: self, binary_op }
  }

  /// Running fold from an explicit seed; every accumulation is emitted. A
  /// source that completes without values emits the seed before completing.
  #[inline]
  fn scan_initial<Out, B>(self, initial: Out, binary_op: B) -> ScanInitialOp<Self, B, Out>
  where
    B: FnMut(Out, Self::Item) -> Out,
  {
    ScanInitialOp { source: self, binary_op, initial }
  }

  /// Emit only the first `count` values, then complete and drop upstream.
  #[inline]
  fn take(self, count: usize) -> TakeOp<Self> {
    TakeOp { source: self, count }
  }

  /// Mirror the source until `notifier` emits anything; the next source
  /// event after that completes the stream.
  #[inline]
  fn take_until<N>(self, notifier: N) -> TakeUntilOp<Self, N> {
    TakeUntilOp { source: self, notifier }
  }

  /// Drop the first `count` values, forward the rest.
  #[inline]
  fn skip(self, count: usize) -> SkipOp<Self> {
    SkipOp { source: self, count }
  }

  /// Drop values until `notifier` emits anything.
  #[inline]
  fn skip_until<N>(self, notifier: N) -> SkipUntilOp<Self, N> {
    SkipUntilOp { source: self, notifier }
  }

  /// Suppress a value equal to the one forwarded before it.
  #[inline]
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self> {
    DistinctUntilChangedOp { source: self }
  }

  // ----------------------------------------------------------- combination

  /// Emit values of both sources in arrival order; complete once both have
  /// completed, fail as soon as either fails.
  #[inline]
  fn merge<S>(self, other: S) -> MergeOp<Self, S>
  where
    S: Observable<Item = Self::Item, Err = Self::Err>,
  {
    MergeOp { source1: self, source2: other }
  }

  /// Split the stream into keyed [`GroupSubject`](crate::subject::GroupSubject)s.
  /// Each group is emitted on its first occurrence and then carries
  /// `value_selector(x)` for every source value of its key, in source order.
  #[inline]
  fn group_by<KS, VS, K, V>(self, key_selector: KS, value_selector: VS) -> GroupByOp<Self, KS, VS>
  where
    KS: FnMut(&Self::Item) -> K,
    VS: FnMut(Self::Item) -> V,
    K: Ord,
  {
    GroupByOp { source: self, key_selector, value_selector }
  }

  // ------------------------------------------------------------------ time

  /// Re-emit every value and the completion after `delay` on `scheduler`.
  /// Errors skip the scheduler hop.
  #[inline]
  fn delay<SD>(self, delay: Duration, scheduler: SD) -> DelayOp<Self, SD> {
    DelayOp { source: self, delay, scheduler }
  }

  /// Emit the most recent value once the source stayed silent for
  /// `duration`; completion flushes a pending value first.
  #[inline]
  fn debounce<SD>(self, duration: Duration, scheduler: SD) -> DebounceOp<Self, SD> {
    DebounceOp { source: self, duration, scheduler }
  }

  /// Emit a value only if at least `window` elapsed since the last emission,
  /// otherwise drop it.
  #[inline]
  fn throttle_time(self, window: Duration) -> ThrottleTimeOp<Self> {
    ThrottleTimeOp { source: self, window }
  }

  /// Re-deliver every notification on `scheduler`, preserving arrival order.
  #[inline]
  fn observe_on<SD>(self, scheduler: SD) -> ObserveOnOp<Self, SD> {
    ObserveOnOp { source: self, scheduler }
  }

  /// Perform the subscription itself (and its release) on `scheduler`.
  #[inline]
  fn subscribe_on<SD>(self, scheduler: SD) -> SubscribeOnOp<Self, SD> {
    SubscribeOnOp { source: self, scheduler }
  }

  // ------------------------------------------------------------- multicast

  /// Multicast through a publish [`Subject`]; upstream is subscribed on
  /// `connect`.
  #[inline]
  fn publish(self) -> ConnectableObservable<Self, Subject<Self::Item, Self::Err>> {
    ConnectableObservable::new(self, Subject::new())
  }

  /// Multicast through a [`BehaviorSubject`] latched on `initial`.
  #[inline]
  fn publish_behavior(
    self,
    initial: Self::Item,
  ) -> ConnectableObservable<Self, BehaviorSubject<Self::Item, Self::Err>> {
    ConnectableObservable::new(self, BehaviorSubject::new(initial))
  }

  /// Multicast only the final value through an [`AsyncSubject`].
  #[inline]
  fn publish_last(
    self,
  ) -> ConnectableObservable<Self, AsyncSubject<Self::Item, Self::Err>> {
    ConnectableObservable::new(self, AsyncSubject::new())
  }

  // ----------------------------------------------------------- subscribing

  /// Subscribe with a pre-built observer.
  fn subscribe_with<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static,
  {
    let subscription = SharedSubscription::default();
    let observer = AutoDetachObserver::new(observer, subscription.clone());
    self.actual_subscribe(Subscriber { observer, subscription })
  }

  fn subscribe<N>(self, next: N) -> Self::Unsub
  where
    N: FnMut(Self::Item) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    self.subscribe_with(ObserverNext::new(next))
  }

  fn subscribe_err<N, E>(self, next: N, error: E) -> Self::Unsub
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    self.subscribe_with(ObserverErr::new(next, error))
  }

  fn subscribe_complete<N, C>(self, next: N, complete: C) -> Self::Unsub
  where
    N: FnMut(Self::Item) + Send + 'static,
    C: FnMut() + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    self.subscribe_with(ObserverComp::new(next, complete))
  }

  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Self::Unsub
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
    C: FnMut() + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Blocking drain: subscribe with `next` and park the calling thread until
  /// the stream terminates. A captured error is handed back to the caller.
  fn for_each<N>(self, next: N) -> Result<(), Self::Err>
  where
    N: FnMut(Self::Item) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let latch = Arc::new((Mutex::new(None::<Result<(), Self::Err>>), Condvar::new()));
    let error_latch = latch.clone();
    let complete_latch = latch.clone();
    self.subscribe_all(
      next,
      move |err| {
        let (result, wake) = &*error_latch;
        *result.lock().unwrap() = Some(Err(err));
        wake.notify_one();
      },
      move || {
        let (result, wake) = &*complete_latch;
        *result.lock().unwrap() = Some(Ok(()));
        wake.notify_one();
      },
    );

    let (result, wake) = &*latch;
    let mut done = result.lock().unwrap();
    while done.is_none() {
      done = wake.wait(done).unwrap();
    }
    done.take().unwrap()
  }
}
