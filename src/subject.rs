//! Hot, multicast sources. Every subject is an `Observer` and an
//! `Observable` at once; attached observers share one emission stream.
//!
//! All state transitions and observer-table mutations happen under the
//! subject's lock; delivery happens after the lock is released, over a
//! snapshot taken under it. A subscriber attaching while an emission is in
//! flight therefore does not receive that emission, and an observer removed
//! mid-emission may still see the one event whose snapshot holds it.

use std::sync::{Arc, Mutex};

use crate::observer::Observer;

mod subscribers;
pub(crate) use subscribers::{Snapshot, Subscribers};

mod subject_subscription;
pub(crate) use subject_subscription::ObserverTable;
pub use subject_subscription::SubjectSubscription;

pub mod publish_subject;
pub use publish_subject::Subject;

pub mod behavior_subject;
pub use behavior_subject::BehaviorSubject;

pub mod async_subject;
pub use async_subject::AsyncSubject;

pub mod group_subject;
pub use group_subject::GroupSubject;

pub(crate) type BoxObserver<Item, Err> =
  Box<dyn Observer<Item = Item, Err = Err> + Send>;

/// One attached observer, shared between the table and emission snapshots.
pub(crate) type RefObserver<Item, Err> = Arc<Mutex<BoxObserver<Item, Err>>>;

/// Lifecycle of a subject; transitions are monotonic.
pub(crate) enum SubjectState<Err> {
  Forwarding,
  Completed,
  Error(Err),
}

impl<Err> SubjectState<Err> {
  #[inline]
  pub(crate) fn is_forwarding(&self) -> bool {
    matches!(self, SubjectState::Forwarding)
  }
}
