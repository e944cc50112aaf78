use crate::subscription::SubscriptionLike;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared mutable cell used by operators whose observer is reached from more
/// than one place, e.g. both the downstream chain and a scheduled timer task.
///
/// Lock poisoning is treated as fatal: a panicking observer has already
/// broken the pipeline's invariants.
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(value: T) -> Self { MutArc(Arc::new(Mutex::new(value))) }

  pub fn rc_deref(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap() }

  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> { self.0.lock().unwrap() }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { MutArc(self.0.clone()) }
}

impl<T: SubscriptionLike> SubscriptionLike for MutArc<T> {
  fn unsubscribe(&mut self) { self.rc_deref_mut().unsubscribe(); }

  fn is_closed(&self) -> bool { self.rc_deref().is_closed() }
}
