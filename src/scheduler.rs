use crate::subscription::SubscriptionLike;
use futures::future::AbortHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod manual_scheduler;
pub use manual_scheduler::ManualScheduler;

/// An execution context tasks can be handed to, now or after a delay.
///
/// Operators never block and never read the wall clock themselves; every
/// time-based behavior goes through a `Scheduler`, which is what makes the
/// whole pipeline drivable by the virtual-clock [`ManualScheduler`] in tests.
pub trait Scheduler: Clone + Send + 'static {
  fn schedule(
    &self,
    task: impl FnOnce() + Send + 'static,
    delay: Option<Duration>,
  ) -> SpawnHandle;
}

/// Cancellation handle for a scheduled task. Unsubscribing a handle whose
/// task has not run yet guarantees the task never runs.
#[derive(Clone)]
pub struct SpawnHandle {
  abort: AbortHandle,
  closed: Arc<AtomicBool>,
}

impl SpawnHandle {
  pub fn new(abort: AbortHandle) -> Self {
    SpawnHandle {
      abort,
      closed: Arc::new(AtomicBool::new(false)),
    }
  }
}

impl SubscriptionLike for SpawnHandle {
  fn unsubscribe(&mut self) {
    if !self.closed.swap(true, Ordering::Relaxed) {
      self.abort.abort();
    }
  }

  fn is_closed(&self) -> bool { self.closed.load(Ordering::Relaxed) }
}

#[cfg(feature = "futures-scheduler")]
mod thread_pool {
  use super::*;
  use futures::executor::ThreadPool;
  use futures::future::{AbortHandle, Abortable};
  use once_cell::sync::Lazy;

  static DEFAULT_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    ThreadPool::new().expect("default thread pool failed to build")
  });

  /// The lazily-built process-wide background pool. Cloning a `ThreadPool`
  /// clones a handle to the same pool.
  pub fn shared_pool() -> ThreadPool { DEFAULT_POOL.clone() }

  impl Scheduler for ThreadPool {
    fn schedule(
      &self,
      task: impl FnOnce() + Send + 'static,
      delay: Option<Duration>,
    ) -> SpawnHandle {
      let (abort, registration) = AbortHandle::new_pair();
      let handle = SpawnHandle::new(abort);
      let fut = async move {
        if let Some(delay) = delay {
          futures_time::task::sleep(delay.into()).await;
        }
        task();
      };
      self.spawn_ok(async move {
        let _ = Abortable::new(fut, registration).await;
      });
      handle
    }
  }
}

#[cfg(feature = "futures-scheduler")]
pub use thread_pool::shared_pool;

#[cfg(feature = "tokio-scheduler")]
mod tokio_runtime {
  use super::*;
  use futures::future::{AbortHandle, Abortable};

  impl Scheduler for tokio::runtime::Handle {
    fn schedule(
      &self,
      task: impl FnOnce() + Send + 'static,
      delay: Option<Duration>,
    ) -> SpawnHandle {
      let (abort, registration) = AbortHandle::new_pair();
      let handle = SpawnHandle::new(abort);
      let fut = async move {
        if let Some(delay) = delay {
          tokio::time::sleep(delay).await;
        }
        task();
      };
      self.spawn(async move {
        let _ = Abortable::new(fut, registration).await;
      });
      handle
    }
  }
}
