use super::Subject;
use crate::observable::Observable;
use crate::observer::Observer;
use crate::subscriber::Subscriber;
use crate::subscription::SharedSubscription;
use crate::{complete_proxy_impl, error_proxy_impl, is_stopped_proxy_impl, next_proxy_impl};

/// A publish subject carrying the immutable key it was grouped under; the
/// per-key stream handed out by `group_by`.
pub struct GroupSubject<K, Item, Err> {
  key: K,
  subject: Subject<Item, Err>,
}

impl<K, Item, Err> GroupSubject<K, Item, Err> {
  pub fn new(key: K) -> Self {
    GroupSubject { key, subject: Subject::new() }
  }

  #[inline]
  pub fn key(&self) -> &K { &self.key }
}

impl<K: Clone, Item, Err> Clone for GroupSubject<K, Item, Err> {
  fn clone(&self) -> Self {
    GroupSubject { key: self.key.clone(), subject: self.subject.clone() }
  }
}

impl<K, Item, Err> Observer for GroupSubject<K, Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;
  next_proxy_impl!(Item, subject);
  error_proxy_impl!(Err, subject);
  complete_proxy_impl!(subject);
  is_stopped_proxy_impl!(subject);
}

impl<K, Item, Err> Observable for GroupSubject<K, Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  #[inline]
  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    self.subject.actual_subscribe(subscriber)
  }
}
