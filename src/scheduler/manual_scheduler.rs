use super::{Scheduler, SpawnHandle};
use crate::subscription::SubscriptionLike;
use futures::future::AbortHandle;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A scheduler driven by hand instead of by threads and the wall clock.
///
/// Tasks pile up until the owner advances the virtual clock and pumps them
/// with [`run_tasks`](ManualScheduler::run_tasks). Due tasks run in
/// submission order, which makes it a FIFO "foreground context" an embedder
/// can pump from its own event loop, and the deterministic driver behind
/// every time-based test in this crate.
#[derive(Clone)]
pub struct ManualScheduler {
  core: Arc<Mutex<Core>>,
}

struct Core {
  now: Instant,
  tasks: Vec<PendingTask>,
}

struct PendingTask {
  due: Instant,
  handle: SpawnHandle,
  task: Box<dyn FnOnce() + Send>,
}

impl ManualScheduler {
  pub fn new(now: Instant) -> Self {
    ManualScheduler {
      core: Arc::new(Mutex::new(Core { now, tasks: vec![] })),
    }
  }

  pub fn now() -> Self { Self::new(Instant::now()) }

  /// Move the virtual clock forward without running anything.
  pub fn advance(&self, by: Duration) {
    self.core.lock().unwrap().now += by;
  }

  /// Run every task that is due, including tasks that become due because a
  /// running task scheduled them with no delay.
  pub fn run_tasks(&self) {
    loop {
      let due_task = {
        let mut core = self.core.lock().unwrap();
        core.tasks.retain(|t| !t.handle.is_closed());
        let now = core.now;
        match core.tasks.iter().position(|t| t.due <= now) {
          Some(idx) => Some(core.tasks.remove(idx).task),
          None => None,
        }
      };
      // The lock is released here so the task may schedule again.
      match due_task {
        Some(task) => task(),
        None => break,
      }
    }
  }

  /// Step the clock `times` times by `advance_by`, pumping after each step.
  pub fn advance_and_run(&self, advance_by: Duration, times: usize) {
    for _ in 0..times {
      self.advance(advance_by);
      self.run_tasks();
    }
  }

  /// Number of scheduled tasks that are still live (not run, not
  /// cancelled).
  pub fn pending(&self) -> usize {
    let core = self.core.lock().unwrap();
    core.tasks.iter().filter(|t| !t.handle.is_closed()).count()
  }
}

impl Default for ManualScheduler {
  fn default() -> Self { Self::now() }
}

impl Scheduler for ManualScheduler {
  fn schedule(
    &self,
    task: impl FnOnce() + Send + 'static,
    delay: Option<Duration>,
  ) -> SpawnHandle {
    let handle = SpawnHandle::new(AbortHandle::new_pair().0);
    let mut core = self.core.lock().unwrap();
    let due = core.now + delay.unwrap_or_default();
    core.tasks.push(PendingTask {
      due,
      handle: handle.clone(),
      task: Box::new(task),
    });
    handle
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn runs_when_due() {
    let scheduler = ManualScheduler::now();
    let hits = Arc::new(Mutex::new(0));
    let h = hits.clone();
    let delay = Duration::from_millis(100);
    scheduler.schedule(move || *h.lock().unwrap() += 1, Some(delay));

    scheduler.advance(Duration::from_millis(99));
    scheduler.run_tasks();
    assert_eq!(*hits.lock().unwrap(), 0);

    scheduler.advance(Duration::from_millis(1));
    scheduler.run_tasks();
    assert_eq!(*hits.lock().unwrap(), 1);

    scheduler.advance(10 * delay);
    scheduler.run_tasks();
    assert_eq!(*hits.lock().unwrap(), 1);
  }

  #[test]
  fn cancelled_task_never_runs() {
    let scheduler = ManualScheduler::now();
    let hits = Arc::new(Mutex::new(0));
    let h = hits.clone();
    let mut handle = scheduler
      .schedule(move || *h.lock().unwrap() += 1, Some(Duration::from_millis(5)));
    handle.unsubscribe();
    assert!(handle.is_closed());
    assert_eq!(scheduler.pending(), 0);

    scheduler.advance_and_run(Duration::from_millis(10), 2);
    assert_eq!(*hits.lock().unwrap(), 0);
  }

  #[test]
  fn due_tasks_run_in_submission_order() {
    let scheduler = ManualScheduler::now();
    let order = Arc::new(Mutex::new(vec![]));
    for i in 0..4 {
      let o = order.clone();
      scheduler.schedule(move || o.lock().unwrap().push(i), None);
    }
    scheduler.run_tasks();
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
  }

  #[test]
  fn task_may_reschedule_itself() {
    let scheduler = ManualScheduler::now();
    let hits = Arc::new(Mutex::new(0));
    let h = hits.clone();
    let s = scheduler.clone();
    scheduler.schedule(
      move || {
        *h.lock().unwrap() += 1;
        let h2 = h.clone();
        s.schedule(move || *h2.lock().unwrap() += 1, None);
      },
      None,
    );
    scheduler.run_tasks();
    assert_eq!(*hits.lock().unwrap(), 2);
  }
}
