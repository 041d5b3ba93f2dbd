use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::scheduler::{CurrentThreadScheduler, Scheduler};
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;

/// `subscribe` is called once per subscription and drives the handed
/// observer: `next` new values, then `complete` or `error` at most once.
/// A failure of the body is signalled by calling `error` on the observer.
///
/// When a subscribe cascade is already running synchronously on this thread,
/// the body is queued on the current-thread trampoline instead of being
/// entered recursively, so deeply chained synchronous subscribes cannot
/// overflow the stack.
pub fn create<F, Item, Err>(subscribe: F) -> ObservableFn<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item = Item, Err = Err>),
{
  ObservableFn(subscribe, TypeHint::new())
}

#[derive(Clone)]
pub struct ObservableFn<F, Item, Err>(F, TypeHint<(Item, Err)>);

impl<F, Item, Err> Observable for ObservableFn<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item = Item, Err = Err>) + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let scheduler = CurrentThreadScheduler;
    if scheduler.is_schedule_required() {
      let subscribe = self.0;
      let handle = scheduler.schedule(
        move |_, mut subscriber: Subscriber<O>| (subscribe)(&mut subscriber),
        None,
        subscriber,
      );
      subscription.add(handle);
    } else {
      let mut subscriber = subscriber;
      (self.0)(&mut subscriber);
    }
    subscription
  }
}
