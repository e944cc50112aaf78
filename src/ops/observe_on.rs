use crate::prelude::*;
use std::collections::VecDeque;

/// Re-delivers every signal on the given scheduler.
///
/// Signals are queued in arrival order and drained by at most one drain task
/// at a time, so downstream sees them in FIFO order even when the scheduler
/// runs drain tasks on several pool threads. This is the hop that moves
/// results from a background context onto the context that owns the
/// pipeline's target state.
///
/// A cancelled chain drops whatever is still queued; a chain that ends with
/// `complete` or `error` flushes the queue first, terminal signal included.
pub struct ObserveOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for ObserveOnOp<S, SD>
where
  S: Observable,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
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
    self.source.actual_subscribe(Subscriber {
      observer: ObserveOnObserver {
        observer: MutArc::own(observer),
        queue: MutArc::own(HopQueue {
          signals: VecDeque::new(),
          terminated: false,
          draining: false,
        }),
        scheduler: self.scheduler,
        subscription: subscription.clone(),
      },
      subscription,
    })
  }
}

enum HopSignal<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

struct HopQueue<Item, Err> {
  signals: VecDeque<HopSignal<Item, Err>>,
  terminated: bool,
  draining: bool,
}

pub struct ObserveOnObserver<O: Observer, SD> {
  observer: MutArc<O>,
  queue: MutArc<HopQueue<O::Item, O::Err>>,
  scheduler: SD,
  subscription: SharedSubscription,
}

impl<O, SD> ObserveOnObserver<O, SD>
where
  O: Observer + Send + 'static,
  O::Item: Send + 'static,
  O::Err: Send + 'static,
  SD: Scheduler,
{
  fn enqueue(&mut self, signal: HopSignal<O::Item, O::Err>) {
    {
      let mut queue = self.queue.rc_deref_mut();
      if queue.terminated {
        return;
      }
      if matches!(signal, HopSignal::Error(_) | HopSignal::Complete) {
        queue.terminated = true;
      }
      queue.signals.push_back(signal);
    }
    let observer = self.observer.clone();
    let queue = self.queue.clone();
    let subscription = self.subscription.clone();
    self
      .scheduler
      .schedule(move || drain(observer, queue, subscription), None);
  }
}

fn drain<O: Observer>(
  observer: MutArc<O>,
  queue: MutArc<HopQueue<O::Item, O::Err>>,
  subscription: SharedSubscription,
) {
  {
    let mut queue = queue.rc_deref_mut();
    if queue.draining {
      return;
    }
    queue.draining = true;
  }
  loop {
    let signal = {
      let mut queue = queue.rc_deref_mut();
      // A cancelled chain drops its queue; a terminated chain is closed too
      // but still owes downstream the queued signals and the terminal one.
      if subscription.is_closed() && !queue.terminated {
        queue.signals.clear();
      }
      match queue.signals.pop_front() {
        Some(signal) => signal,
        None => {
          queue.draining = false;
          return;
        }
      }
    };
    // The queue lock is not held here, so the observer may synchronously
    // feed values back into this pipeline.
    let mut observer = observer.rc_deref_mut();
    match signal {
      HopSignal::Next(value) => observer.next(value),
      HopSignal::Error(err) => observer.error(err),
      HopSignal::Complete => observer.complete(),
    }
  }
}

impl<O, SD> Observer for ObserveOnObserver<O, SD>
where
  O: Observer + Send + 'static,
  O::Item: Send + 'static,
  O::Err: Send + 'static,
  SD: Scheduler,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    self.enqueue(HopSignal::Next(value));
  }

  fn error(&mut self, err: Self::Err) { self.enqueue(HopSignal::Error(err)); }

  fn complete(&mut self) { self.enqueue(HopSignal::Complete); }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn delivers_on_the_target_scheduler_in_order() {
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let mut subject = Subject::<i32, ()>::new();
    subject
      .clone()
      .observe_on(scheduler.clone())
      .subscribe(move |v| s.lock().unwrap().push(v));

    subject.next(1);
    subject.next(2);
    subject.next(3);
    assert!(seen.lock().unwrap().is_empty());
    scheduler.run_tasks();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn nothing_delivered_after_cancel() {
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let mut subject = Subject::<i32, ()>::new();
    let mut subscription = subject
      .clone()
      .observe_on(scheduler.clone())
      .subscribe(move |v| s.lock().unwrap().push(v));

    subject.next(1);
    subscription.unsubscribe();
    scheduler.run_tasks();
    assert!(seen.lock().unwrap().is_empty());
  }

  #[test]
  fn queued_signals_flush_on_complete() {
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(false));
    let (s, c) = (seen.clone(), completed.clone());
    let mut subject = Subject::<i32, ()>::new();
    subject.clone().observe_on(scheduler.clone()).subscribe_all(
      move |v| s.lock().unwrap().push(v),
      |_| {},
      move || *c.lock().unwrap() = true,
    );

    subject.next(1);
    subject.complete();
    assert!(seen.lock().unwrap().is_empty());
    scheduler.run_tasks();
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn upstream_error_flushes_after_queued_values() {
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let errs = Arc::new(Mutex::new(vec![]));
    let (s, e) = (seen.clone(), errs.clone());
    let mut subject = Subject::<i32, &str>::new();
    subject.clone().observe_on(scheduler.clone()).subscribe_err(
      move |v| s.lock().unwrap().push(v),
      move |err| e.lock().unwrap().push(err),
    );

    subject.next(1);
    subject.error("late");
    scheduler.run_tasks();
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(*errs.lock().unwrap(), vec!["late"]);
  }

  #[test]
  fn feedback_into_the_source_is_delivered() {
    let scheduler = ManualScheduler::now();
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let mut subject = Subject::<i32, ()>::new();
    let mut source = subject.clone();
    subject
      .clone()
      .observe_on(scheduler.clone())
      .subscribe(move |v| {
        s.lock().unwrap().push(v);
        // a downstream write that immediately produces new input
        if v < 2 {
          source.next(v + 1);
        }
      });

    subject.next(0);
    scheduler.run_tasks();
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
  }

  #[cfg(feature = "futures-scheduler")]
  #[test]
  fn pool_hop_preserves_order() {
    use std::time::Duration;

    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let mut subject = Subject::<i32, ()>::new();
    subject
      .clone()
      .observe_on(shared_pool())
      .subscribe(move |v| s.lock().unwrap().push(v));

    for i in 0..100 {
      subject.next(i);
    }
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while seen.lock().unwrap().len() < 100 {
      assert!(std::time::Instant::now() < deadline, "hop never drained");
      std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(*seen.lock().unwrap(), (0..100).collect::<Vec<_>>());
  }
}
