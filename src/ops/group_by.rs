use std::collections::BTreeMap;

use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::subject::GroupSubject;
use crate::subscriber::Subscriber;
use crate::is_stopped_proxy_impl;

#[derive(Clone)]
pub struct GroupByOp<S, KS, VS> {
  pub(crate) source: S,
  pub(crate) key_selector: KS,
  pub(crate) value_selector: VS,
}

impl<S, KS, VS, K, V> Observable for GroupByOp<S, KS, VS>
where
  S: Observable,
  S::Item: Send + 'static,
  KS: FnMut(&S::Item) -> K + Send + 'static,
  VS: FnMut(S::Item) -> V + Send + 'static,
  K: Ord + Clone + Send + 'static,
  V: Clone + Send + 'static,
  S::Err: Clone + Send + 'static,
{
  type Item = GroupSubject<K, V, S::Err>;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = GroupSubject<K, V, S::Err>, Err = S::Err> + Send + 'static,
  {
    let GroupByOp { source, key_selector, value_selector } = self;
    source.actual_subscribe(Subscriber {
      observer: GroupByObserver {
        observer: subscriber.observer,
        key_selector,
        value_selector,
        groups: BTreeMap::new(),
        _hint: TypeHint::new(),
      },
      subscription: subscriber.subscription,
    })
  }
}

/// Routes each source value into its keyed [`GroupSubject`], creating and
/// emitting the group on first occurrence. The map is ordered by key, outer
/// emission order is first-occurrence order.
pub struct GroupByObserver<O, KS, VS, K, V, Err, Item> {
  observer: O,
  key_selector: KS,
  value_selector: VS,
  groups: BTreeMap<K, GroupSubject<K, V, Err>>,
  _hint: TypeHint<Item>,
}

impl<O, KS, VS, K, V, Item, Err> Observer for GroupByObserver<O, KS, VS, K, V, Err, Item>
where
  O: Observer<Item = GroupSubject<K, V, Err>, Err = Err>,
  KS: FnMut(&Item) -> K,
  VS: FnMut(Item) -> V,
  K: Ord + Clone,
  V: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let key = (self.key_selector)(&value);
    if !self.groups.contains_key(&key) {
      let group = GroupSubject::new(key.clone());
      self.groups.insert(key.clone(), group.clone());
      self.observer.next(group);
    }
    let value = (self.value_selector)(value);
    if let Some(group) = self.groups.get_mut(&key) {
      group.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    for group in self.groups.values_mut() {
      group.error(err.clone());
    }
    self.observer.error(err);
  }

  fn complete(&mut self) {
    for group in self.groups.values_mut() {
      group.complete();
    }
    self.observer.complete();
  }

  is_stopped_proxy_impl!(observer);
}
