use crate::observable::{ConnectableObservable, ConnectionSubscription, Observable};
use crate::observer::Observer;
use crate::rc::{MutArc, RcDerefMut};
use crate::subscriber::Subscriber;
use crate::subscription::{SharedSubscription, SubscriptionLike, TeardownFn};

impl<S, Subj> ConnectableObservable<S, Subj> {
  /// Make the connectable behave like an ordinary observable by counting its
  /// subscribers: the first one connects to the source, the last one leaving
  /// disposes the connection.
  pub fn ref_count(self) -> RefCountOp<S, Subj> {
    RefCountOp {
      inner: MutArc::own(RefCountInner { connectable: self, connection: None, count: 0 }),
    }
  }
}

struct RefCountInner<S, Subj> {
  connectable: ConnectableObservable<S, Subj>,
  connection: Option<ConnectionSubscription>,
  count: usize,
}

pub struct RefCountOp<S, Subj> {
  inner: MutArc<RefCountInner<S, Subj>>,
}

impl<S, Subj> Clone for RefCountOp<S, Subj> {
  fn clone(&self) -> Self { RefCountOp { inner: self.inner.clone() } }
}

impl<S, Subj> Observable for RefCountOp<S, Subj>
where
  S: Observable + Clone + Send + 'static,
  Subj: Observable<Item = S::Item, Err = S::Err>
    + Observer<Item = S::Item, Err = S::Err>
    + Clone
    + Send
    + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SharedSubscription
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    {
      let mut inner = self.inner.rc_deref_mut();
      // Attach to the subject first: a synchronous source emits during
      // connect and the new subscriber must not miss that burst.
      inner.connectable.clone().actual_subscribe(subscriber);
      inner.count += 1;
      if inner.count == 1 {
        let connection = inner.connectable.connect();
        inner.connection = Some(connection);
      }
    }

    let state = self.inner.clone();
    subscription.add(TeardownFn::new(move || {
      let connection = {
        let mut inner = state.rc_deref_mut();
        inner.count -= 1;
        if inner.count == 0 { inner.connection.take() } else { None }
      };
      if let Some(mut connection) = connection {
        connection.unsubscribe();
      }
    }));
    subscription
  }
}
