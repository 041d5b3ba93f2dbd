//! Re-exports of everything needed to build and consume streams.

pub use crate::observable;
pub use crate::observable::{
  ConnectableObservable, ConnectionSubscription, Observable,
};
pub use crate::observer::{
  Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext, TypeHint,
};
pub use crate::ops;
pub use crate::rc::CellArc;
pub use crate::scheduler::{
  CurrentThreadScheduler, ScheduledSubscription, Scheduler, SpawnHandle,
};
pub use crate::subject::{
  AsyncSubject, BehaviorSubject, GroupSubject, Subject, SubjectSubscription,
};
pub use crate::subscriber::{AutoDetachObserver, Subscriber};
pub use crate::subscription::{
  SerialSubscription, SharedSubscription, SubscriptionLike, TeardownFn,
};
