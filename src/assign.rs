use crate::prelude::*;
use std::marker::PhantomData;
use std::sync::{Mutex, Weak};
use tracing::trace;

/// Terminal observer that writes each value into shared state.
///
/// The target is held weakly so a pipeline never keeps its owner alive; when
/// the owner is gone the observer unsubscribes the whole chain instead of
/// writing. Errors are not expected to reach this stage, but one that does
/// also tears the chain down rather than panicking.
pub struct AssignObserver<T, F, Item, Err> {
  target: Weak<Mutex<T>>,
  write: F,
  subscription: SharedSubscription,
  _marker: PhantomData<(Item, Err)>,
}

impl<T, F, Item, Err> AssignObserver<T, F, Item, Err> {
  pub(crate) fn new(
    target: Weak<Mutex<T>>,
    write: F,
    subscription: SharedSubscription,
  ) -> Self {
    AssignObserver {
      target,
      write,
      subscription,
      _marker: PhantomData,
    }
  }
}

impl<T, F, Item, Err> Observer for AssignObserver<T, F, Item, Err>
where
  F: FnMut(&mut T, Item),
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    match self.target.upgrade() {
      Some(target) => (self.write)(&mut *target.lock().unwrap(), value),
      None => {
        trace!("assign: target dropped, tearing the pipeline down");
        self.subscription.unsubscribe();
      }
    }
  }

  fn error(&mut self, _err: Err) { self.subscription.unsubscribe(); }

  fn complete(&mut self) {}
}
