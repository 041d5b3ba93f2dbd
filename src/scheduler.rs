use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use futures::future::RemoteHandle;
use futures::prelude::*;
use futures::task::{Spawn, SpawnExt};
use futures_timer::Delay;

use crate::subscription::{SharedSubscription, SubscriptionLike};

/// A Scheduler is an object to order tasks and schedule their execution, now
/// or after a delay. The returned subscription cancels a task that has not
/// fired yet; a running task observes cancellation through the subscription
/// it is handed.
pub trait Scheduler {
  fn schedule<T: Send + 'static>(
    &self,
    task: impl FnOnce(SharedSubscription, T) + Send + 'static,
    delay: Option<Duration>,
    state: T,
  ) -> SharedSubscription;

  /// `true` while a synchronous subscribe cascade is already running on this
  /// thread and new work must be queued instead of entered recursively. Only
  /// the current-thread scheduler ever reports `true`.
  #[inline]
  fn is_schedule_required(&self) -> bool { false }
}

impl<S: Spawn> Scheduler for S {
  fn schedule<T: Send + 'static>(
    &self,
    task: impl FnOnce(SharedSubscription, T) + Send + 'static,
    delay: Option<Duration>,
    state: T,
  ) -> SharedSubscription {
    let subscription = SharedSubscription::default();
    let c_subscription = subscription.clone();
    let delay = delay.unwrap_or_default();
    let f = Delay::new(delay).inspect(move |_| task(c_subscription, state));
    let handle = self
      .spawn_with_handle(f)
      .expect("spawn scheduled task failed");
    subscription.add(SpawnHandle::new(handle));
    subscription
  }
}

pub struct SpawnHandle<T>(Option<RemoteHandle<T>>);

impl<T> SpawnHandle<T> {
  #[inline]
  pub fn new(handle: RemoteHandle<T>) -> Self { SpawnHandle(Some(handle)) }
}

impl<T> SubscriptionLike for SpawnHandle<T> {
  #[inline]
  fn unsubscribe(&mut self) { self.0.take(); }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_none() }
}

impl<T> Drop for SpawnHandle<T> {
  fn drop(&mut self) {
    if let Some(handle) = self.0.take() {
      handle.forget()
    }
  }
}

struct TrampolineTask {
  due: Option<Instant>,
  run: Box<dyn FnOnce()>,
}

thread_local! {
  static QUEUE: RefCell<VecDeque<TrampolineTask>> = RefCell::new(VecDeque::new());
  static DRAINING: Cell<bool> = Cell::new(false);
}

/// Cooperative scheduler for the thread it is used on. The first `schedule`
/// on a thread runs the task in place and then drains whatever the task
/// queued; `schedule` calls issued while that drain is running are enqueued
/// instead of entered recursively, which is what breaks unbounded synchronous
/// subscribe cascades.
#[derive(Clone, Copy, Default)]
pub struct CurrentThreadScheduler;

impl CurrentThreadScheduler {
  fn run_task(task: TrampolineTask) {
    if let Some(due) = task.due {
      let now = Instant::now();
      if due > now {
        thread::sleep(due - now);
      }
    }
    (task.run)();
  }
}

impl Scheduler for CurrentThreadScheduler {
  fn schedule<T: Send + 'static>(
    &self,
    task: impl FnOnce(SharedSubscription, T) + Send + 'static,
    delay: Option<Duration>,
    state: T,
  ) -> SharedSubscription {
    let subscription = SharedSubscription::default();
    let c_subscription = subscription.clone();
    let due = delay.map(|d| Instant::now() + d);
    let queued = TrampolineTask {
      due,
      run: Box::new(move || {
        if !c_subscription.is_closed() {
          task(c_subscription.clone(), state);
        }
      }),
    };

    if DRAINING.with(|d| d.get()) {
      QUEUE.with(|q| q.borrow_mut().push_back(queued));
    } else {
      DRAINING.with(|d| d.set(true));
      Self::run_task(queued);
      while let Some(next) = QUEUE.with(|q| q.borrow_mut().pop_front()) {
        Self::run_task(next);
      }
      DRAINING.with(|d| d.set(false));
    }
    subscription
  }

  #[inline]
  fn is_schedule_required(&self) -> bool { DRAINING.with(|d| d.get()) }
}

/// Defers `unsubscribe` of the wrapped subscription onto a scheduler, so the
/// release side of a chain runs where its subscribe side ran.
pub struct ScheduledSubscription<S, SD> {
  inner: Option<S>,
  scheduler: SD,
}

impl<S, SD> ScheduledSubscription<S, SD> {
  #[inline]
  pub fn new(inner: S, scheduler: SD) -> Self {
    ScheduledSubscription { inner: Some(inner), scheduler }
  }
}

impl<S, SD> SubscriptionLike for ScheduledSubscription<S, SD>
where
  S: SubscriptionLike + Send + 'static,
  SD: Scheduler,
{
  fn unsubscribe(&mut self) {
    if let Some(inner) = self.inner.take() {
      self
        .scheduler
        .schedule(|_, mut inner: S| inner.unsubscribe(), None, inner);
    }
  }

  fn is_closed(&self) -> bool {
    self.inner.as_ref().map_or(true, |s| s.is_closed())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  #[test]
  fn pool_scheduler_runs_task() {
    let pool = futures::executor::ThreadPool::new().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    pool.schedule(
      move |_, _| {
        c_hits.fetch_add(1, Ordering::SeqCst);
      },
      None,
      (),
    );
    thread::sleep(Duration::from_millis(50));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn unsubscribe_cancels_pending_task() {
    let pool = futures::executor::ThreadPool::new().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    let mut handle = pool.schedule(
      move |_, _| {
        c_hits.fetch_add(1, Ordering::SeqCst);
      },
      Some(Duration::from_millis(80)),
      (),
    );
    handle.unsubscribe();
    thread::sleep(Duration::from_millis(160));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn trampoline_queues_reentrant_work() {
    let order = Arc::new(std::sync::Mutex::new(vec![]));
    let scheduler = CurrentThreadScheduler;
    let c_order = order.clone();
    scheduler.schedule(
      move |_, _| {
        c_order.lock().unwrap().push("outer-begin");
        let inner_order = c_order.clone();
        let scheduler = CurrentThreadScheduler;
        assert!(scheduler.is_schedule_required());
        scheduler.schedule(
          move |_, _| inner_order.lock().unwrap().push("inner"),
          None,
          (),
        );
        c_order.lock().unwrap().push("outer-end");
      },
      None,
      (),
    );
    assert!(!scheduler.is_schedule_required());
    assert_eq!(
      *order.lock().unwrap(),
      vec!["outer-begin", "outer-end", "inner"]
    );
  }

  #[test]
  fn trampoline_respects_due_time() {
    let scheduler = CurrentThreadScheduler;
    let begin = Instant::now();
    scheduler.schedule(|_, _| {}, Some(Duration::from_millis(30)), ());
    assert!(begin.elapsed() >= Duration::from_millis(30));
  }
}
