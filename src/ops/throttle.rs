use crate::prelude::*;
use std::time::Duration;
use tracing::trace;

/// Rate-bounds a stream to at most one value per interval, always keeping
/// the most recent value.
///
/// The first value of a burst forwards immediately and opens a window.
/// Values arriving inside the window overwrite a single buffered slot; when
/// the window elapses the buffered value (if any) is forwarded and the next
/// window opens, so the bound also holds across consecutive bursts. A
/// buffered value is dropped, not flushed, when the stream ends or the
/// subscription is cancelled first.
pub struct ThrottleLatestOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for ThrottleLatestOp<S, SD>
where
  S: Observable,
  S::Item: Send + 'static,
  SD: Scheduler,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    let state = MutArc::own(ThrottleState {
      trailing: None,
      window: None,
      closed: false,
    });
    // Tearing down the chain closes the state and cancels a pending window.
    subscription.add(state.clone());
    self.source.actual_subscribe(Subscriber {
      observer: ThrottleObserver {
        observer: MutArc::own(observer),
        state,
        scheduler: self.scheduler,
        interval: self.interval,
      },
      subscription,
    })
  }
}

struct ThrottleState<Item> {
  trailing: Option<Item>,
  window: Option<SpawnHandle>,
  closed: bool,
}

impl<Item> SubscriptionLike for ThrottleState<Item> {
  fn unsubscribe(&mut self) {
    self.closed = true;
    self.trailing = None;
    if let Some(mut window) = self.window.take() {
      window.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.closed }
}

pub struct ThrottleObserver<O: Observer, SD> {
  observer: MutArc<O>,
  state: MutArc<ThrottleState<O::Item>>,
  scheduler: SD,
  interval: Duration,
}

impl<O, SD> Observer for ThrottleObserver<O, SD>
where
  O: Observer + Send + 'static,
  O::Item: Send + 'static,
  SD: Scheduler,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.closed {
        return;
      }
      if state.window.is_some() {
        state.trailing = Some(value);
        return;
      }
    }
    self.observer.rc_deref_mut().next(value);
    open_window(&self.observer, &self.state, &self.scheduler, self.interval);
  }

  // No closed-gate here: the subscriber closes the chain before forwarding
  // an error, which closes this state too. The gate already guarantees a
  // terminal signal arrives at most once.
  fn error(&mut self, err: Self::Err) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.trailing.is_some() {
        trace!("throttle: dropping buffered value on error");
      }
      state.unsubscribe();
    }
    self.observer.rc_deref_mut().error(err);
  }

  fn complete(&mut self) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.closed {
        return;
      }
      if state.trailing.is_some() {
        trace!("throttle: dropping buffered value on complete");
      }
      state.unsubscribe();
    }
    self.observer.rc_deref_mut().complete();
  }
}

fn open_window<O, SD>(
  observer: &MutArc<O>,
  state: &MutArc<ThrottleState<O::Item>>,
  scheduler: &SD,
  interval: Duration,
) where
  O: Observer + Send + 'static,
  O::Item: Send + 'static,
  SD: Scheduler,
{
  let task = {
    let observer = observer.clone();
    let state = state.clone();
    let scheduler = scheduler.clone();
    move || close_window(observer, state, scheduler, interval)
  };
  let mut handle = scheduler.schedule(task, Some(interval));
  let mut state = state.rc_deref_mut();
  if state.closed {
    handle.unsubscribe();
  } else {
    state.window = Some(handle);
  }
}

fn close_window<O, SD>(
  observer: MutArc<O>,
  state: MutArc<ThrottleState<O::Item>>,
  scheduler: SD,
  interval: Duration,
) where
  O: Observer + Send + 'static,
  O::Item: Send + 'static,
  SD: Scheduler,
{
  let trailing = {
    let mut state = state.rc_deref_mut();
    if state.closed {
      return;
    }
    let trailing = state.trailing.take();
    if trailing.is_none() {
      state.window = None;
    }
    trailing
  };
  if let Some(value) = trailing {
    trace!("throttle: flushing trailing value");
    observer.rc_deref_mut().next(value);
    // Flushing counts against the rate bound, so it opens the next window.
    open_window(&observer, &state, &scheduler, interval);
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  const INTERVAL: Duration = Duration::from_millis(500);
  const STEP: Duration = Duration::from_millis(50);

  fn throttled() -> (
    Subject<i32, ()>,
    ManualScheduler,
    Arc<Mutex<Vec<i32>>>,
    SubscriptionWrapper<SharedSubscription>,
  ) {
    let subject = Subject::new();
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let subscription = subject
      .clone()
      .throttle_latest(INTERVAL, scheduler.clone())
      .subscribe(move |v| s.lock().unwrap().push(v));
    (subject, scheduler, seen, subscription)
  }

  #[test]
  fn leading_value_forwards_immediately() {
    let (mut subject, _, seen, _) = throttled();
    subject.next(1);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
  }

  #[test]
  fn burst_keeps_only_latest() {
    let (mut subject, scheduler, seen, _) = throttled();
    subject.next(1);
    subject.next(2);
    subject.next(3);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    // 50ms steps up to the 500ms window edge
    scheduler.advance_and_run(STEP, 10);
    assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
  }

  #[test]
  fn rate_bound_holds_across_windows() {
    let (mut subject, scheduler, seen, _) = throttled();
    subject.next(1);
    scheduler.advance_and_run(STEP, 2); // t = 100
    subject.next(2);
    scheduler.advance_and_run(STEP, 8); // t = 500, flush 2, next window opens
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    scheduler.advance_and_run(STEP, 2); // t = 600
    subject.next(3);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    scheduler.advance_and_run(STEP, 8); // t = 1000, second window edge
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn idle_interval_reopens_the_gate() {
    let (mut subject, scheduler, seen, _) = throttled();
    subject.next(1);
    scheduler.advance_and_run(INTERVAL, 1);
    subject.next(2);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn buffered_value_dropped_on_complete() {
    let (mut subject, scheduler, seen, _) = throttled();
    subject.next(1);
    subject.next(2);
    subject.complete();
    scheduler.advance_and_run(INTERVAL, 2);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(scheduler.pending(), 0);
  }

  #[test]
  fn buffered_value_dropped_on_error() {
    let subject = Subject::<i32, &str>::new();
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let errs = Arc::new(Mutex::new(vec![]));
    let (s, e) = (seen.clone(), errs.clone());
    subject
      .clone()
      .throttle_latest(INTERVAL, scheduler.clone())
      .subscribe_err(
        move |v| s.lock().unwrap().push(v),
        move |err| e.lock().unwrap().push(err),
      );
    let mut subject = subject;
    subject.next(1);
    subject.next(2);
    subject.error("gone");
    scheduler.advance_and_run(INTERVAL, 2);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(*errs.lock().unwrap(), vec!["gone"]);
  }

  #[test]
  fn cancel_clears_pending_window() {
    let (mut subject, scheduler, seen, mut subscription) = throttled();
    subject.next(1);
    subject.next(2);
    subscription.unsubscribe();
    assert_eq!(scheduler.pending(), 0);
    scheduler.advance_and_run(INTERVAL, 2);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
  }
}
