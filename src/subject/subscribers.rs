use std::sync::Weak;

use smallvec::SmallVec;

use super::{BoxObserver, RefObserver};

/// Emission snapshot: the live observers at the instant the subject lock was
/// released.
pub(crate) type Snapshot<Item, Err> = SmallVec<[RefObserver<Item, Err>; 4]>;

/// The observer table of a subject. Removal tombstones the slot instead of
/// shifting the tail; later subscribers reuse tombstones, tracked by a
/// free-slot counter.
pub(crate) struct Subscribers<Item, Err> {
  slots: Vec<Option<RefObserver<Item, Err>>>,
  free_slots: usize,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Subscribers { slots: vec![], free_slots: 0 } }
}

impl<Item, Err> Subscribers<Item, Err> {
  pub(crate) fn attach(&mut self, observer: RefObserver<Item, Err>) {
    if self.free_slots > 0 {
      if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
        *slot = Some(observer);
        self.free_slots -= 1;
        return;
      }
      self.free_slots = 0;
    }
    self.slots.push(Some(observer));
  }

  pub(crate) fn snapshot(&self) -> Snapshot<Item, Err> {
    self.slots.iter().flatten().cloned().collect()
  }

  /// Take every live observer out and clear the table; used for terminal
  /// events, after which the table stays empty for good.
  pub(crate) fn drain(&mut self) -> Snapshot<Item, Err> {
    self.free_slots = 0;
    self.slots.drain(..).flatten().collect()
  }

  /// O(n) scan for the slot holding `target`, replaced by a tombstone.
  pub(crate) fn remove(&mut self, target: &Weak<std::sync::Mutex<BoxObserver<Item, Err>>>) {
    let target = target.as_ptr();
    for slot in self.slots.iter_mut() {
      let hit = slot
        .as_ref()
        .map_or(false, |o| std::sync::Arc::as_ptr(o) == target);
      if hit {
        *slot = None;
        self.free_slots += 1;
        return;
      }
    }
  }

  /// Tombstone the slots holding observers a broadcast found stopped, so
  /// self-terminating subscriptions detach without an explicit unsubscribe.
  /// Identity only, no slot lock is taken: the caller observed stopped-ness
  /// during delivery, and taking slot locks under the table lock would
  /// invert the lock order of an unsubscribe issued inside a callback.
  pub(crate) fn remove_stopped(&mut self, stopped: &[RefObserver<Item, Err>]) {
    for target in stopped {
      for slot in self.slots.iter_mut() {
        let hit = slot
          .as_ref()
          .map_or(false, |o| std::sync::Arc::ptr_eq(o, target));
        if hit {
          *slot = None;
          self.free_slots += 1;
          break;
        }
      }
    }
  }

  pub(crate) fn live_count(&self) -> usize {
    self.slots.len() - self.free_slots
  }
}
