use crate::observable::Observable;
use crate::observer::{Observer, TypeHint};
use crate::subscriber::Subscriber;
use crate::{error_proxy_impl, is_stopped_proxy_impl};

/// Seeded running fold; see [`Observable::scan_initial`].
#[derive(Clone)]
pub struct ScanInitialOp<S, B, Out> {
  pub(crate) source: S,
  pub(crate) binary_op: B,
  pub(crate) initial: Out,
}

impl<S, B, Out> Observable for ScanInitialOp<S, B, Out>
where
  S: Observable,
  S::Item: Send + 'static,
  B: FnMut(Out, S::Item) -> Out + Send + 'static,
  Out: Clone + Send + 'static,
{
  type Item = Out;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Out, Err = S::Err> + Send + 'static,
  {
    let ScanInitialOp { source, binary_op, initial } = self;
    source.actual_subscribe(Subscriber {
      observer: ScanInitialObserver {
        observer: subscriber.observer,
        binary_op,
        acc: initial,
        accumulated: false,
        _hint: TypeHint::new(),
      },
      subscription: subscriber.subscription,
    })
  }
}

pub struct ScanInitialObserver<O, B, Out, Item> {
  observer: O,
  binary_op: B,
  acc: Out,
  accumulated: bool,
  _hint: TypeHint<Item>,
}

impl<O, B, Out, Item, Err> Observer for ScanInitialObserver<O, B, Out, Item>
where
  O: Observer<Item = Out, Err = Err>,
  B: FnMut(Out, Item) -> Out,
  Out: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    self.acc = (self.binary_op)(self.acc.clone(), value);
    self.accumulated = true;
    self.observer.next(self.acc.clone());
  }

  fn complete(&mut self) {
    // A source that never produced a value still surfaces the seed.
    if !self.accumulated {
      self.observer.next(self.acc.clone());
    }
    self.observer.complete();
  }

  error_proxy_impl!(Err, observer);
  is_stopped_proxy_impl!(observer);
}

/// Seedless running fold, the first value seeds the accumulation; see
/// [`Observable::scan`].
#[derive(Clone)]
pub struct ScanOp<S, B> {
  pub(crate) source: S,
  pub(crate) binary_op: B,
}

impl<S, B> Observable for ScanOp<S, B>
where
  S: Observable,
  B: FnMut(S::Item, S::Item) -> S::Item + Send + 'static,
  S::Item: Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let ScanOp { source, binary_op } = self;
    source.actual_subscribe(Subscriber {
      observer: ScanObserver { observer: subscriber.observer, binary_op, acc: None },
      subscription: subscriber.subscription,
    })
  }
}

pub struct ScanObserver<O, B, Item> {
  observer: O,
  binary_op: B,
  acc: Option<Item>,
}

impl<O, B, Item, Err> Observer for ScanObserver<O, B, Item>
where
  O: Observer<Item = Item, Err = Err>,
  B: FnMut(Item, Item) -> Item,
  Item: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    let acc = match self.acc.take() {
      Some(acc) => (self.binary_op)(acc, value),
      None => value,
    };
    self.acc = Some(acc.clone());
    self.observer.next(acc);
  }

  fn complete(&mut self) { self.observer.complete() }

  error_proxy_impl!(Err, observer);
  is_stopped_proxy_impl!(observer);
}
