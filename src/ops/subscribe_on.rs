use crate::observable::Observable;
use crate::observer::Observer;
use crate::scheduler::{ScheduledSubscription, Scheduler};
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike};

/// Performs the act of subscribing to the source on the supplied scheduler;
/// releasing the returned subscription is scheduled there as well.
#[derive(Clone)]
pub struct SubscribeOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for SubscribeOnOp<S, SD>
where
  S: Observable + Send + 'static,
  SD: Scheduler + Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = ScheduledSubscription<SharedSubscription, SD>;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let SubscribeOnOp { source, scheduler } = self;
    let subscription = subscriber.subscription.clone();
    let handle = scheduler.schedule(
      |task_subscription, (source, subscriber): (S, Subscriber<O>)| {
        if !task_subscription.is_closed() {
          source.actual_subscribe(subscriber);
        }
      },
      None,
      (source, subscriber),
    );
    subscription.add(handle);
    ScheduledSubscription::new(subscription, scheduler)
  }
}
