use crate::observable::Observable;
use crate::observer::Observer;
use crate::rc::{MutArc, RcDeref, RcDerefMut};
use crate::subscriber::Subscriber;
use crate::subscription::SubscriptionLike;

/// A subject-backed observable whose upstream subscription is deferred until
/// [`connect`](ConnectableObservable::connect) is called. Subscribers attach
/// to the subject at any time; the source starts emitting on connect.
pub struct ConnectableObservable<S, Subj> {
  source: S,
  subject: Subj,
  connection: MutArc<Option<Box<dyn SubscriptionLike + Send>>>,
}

impl<S, Subj> ConnectableObservable<S, Subj> {
  pub fn new(source: S, subject: Subj) -> Self {
    ConnectableObservable { source, subject, connection: MutArc::own(None) }
  }
}

impl<S: Clone, Subj: Clone> Clone for ConnectableObservable<S, Subj> {
  fn clone(&self) -> Self {
    ConnectableObservable {
      source: self.source.clone(),
      subject: self.subject.clone(),
      connection: self.connection.clone(),
    }
  }
}

impl<S, Subj> Observable for ConnectableObservable<S, Subj>
where
  S: Observable,
  Subj: Observable<Item = S::Item, Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = Subj::Unsub;

  #[inline]
  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    self.subject.actual_subscribe(subscriber)
  }
}

impl<S, Subj> ConnectableObservable<S, Subj>
where
  S: Observable + Clone,
  Subj: Observer<Item = S::Item, Err = S::Err> + Clone + Send + 'static,
{
  /// Subscribe the subject to the source. Connecting while already connected
  /// is a no-op; disposing the returned handle tears the upstream
  /// subscription down and re-arms `connect`.
  pub fn connect(&self) -> ConnectionSubscription {
    let mut connection = self.connection.rc_deref_mut();
    if connection.is_none() {
      let subscriber = Subscriber::new(self.subject.clone());
      *connection = Some(Box::new(self.source.clone().actual_subscribe(subscriber)));
    }
    ConnectionSubscription { connection: self.connection.clone() }
  }
}

/// Handle for an established connection; disposing it disposes the upstream
/// subscription.
#[derive(Clone)]
pub struct ConnectionSubscription {
  connection: MutArc<Option<Box<dyn SubscriptionLike + Send>>>,
}

impl SubscriptionLike for ConnectionSubscription {
  fn unsubscribe(&mut self) {
    let connection = self.connection.rc_deref_mut().take();
    if let Some(mut connection) = connection {
      connection.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.connection.rc_deref().is_none() }
}
