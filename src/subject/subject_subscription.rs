use std::sync::{Arc, Mutex, Weak};

use super::{BoxObserver, RefObserver, Subscribers};
use crate::subscription::SubscriptionLike;

/// Gives the removal handle access to a subject's observer table without
/// naming the concrete subject.
pub(crate) trait ObserverTable<Item, Err> {
  fn table(&mut self) -> &mut Subscribers<Item, Err>;
}

/// Removal handle for one attached observer. Holds weak back-references to
/// both the subject and the observer slot, so a forgotten handle never keeps
/// either alive; if the subject is already gone, removal is a no-op.
pub struct SubjectSubscription<S, Item, Err> {
  subject: Weak<Mutex<S>>,
  slot: Weak<Mutex<BoxObserver<Item, Err>>>,
}

impl<S, Item, Err> SubjectSubscription<S, Item, Err> {
  pub(crate) fn new(
    subject: &Arc<Mutex<S>>,
    slot: &RefObserver<Item, Err>,
  ) -> Self {
    SubjectSubscription {
      subject: Arc::downgrade(subject),
      slot: Arc::downgrade(slot),
    }
  }
}

impl<S, Item, Err> SubscriptionLike for SubjectSubscription<S, Item, Err>
where
  S: ObserverTable<Item, Err>,
{
  fn unsubscribe(&mut self) {
    if let Some(subject) = self.subject.upgrade() {
      subject.lock().unwrap().table().remove(&self.slot);
    }
  }

  fn is_closed(&self) -> bool {
    self.slot.upgrade().is_none() || self.subject.upgrade().is_none()
  }
}
