use smallvec::SmallVec;
use std::any::Any;
use std::sync::{Arc, Mutex};

/// A handle to an active stream connection.
///
/// `unsubscribe` tears the connection down: it runs every registered child
/// teardown exactly once and is idempotent afterwards.
pub trait SubscriptionLike {
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

pub type BoxSubscription = Box<dyn SubscriptionLike + Send>;

impl<T> SubscriptionLike for Box<T>
where
  T: SubscriptionLike + ?Sized,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe(); }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// An empty subscription that never tears anything down, closing with the
/// source itself. Returned by sources that deliver everything eagerly at
/// subscribe time.
#[derive(Default, Clone)]
pub struct SingleSubscription {
  closed: bool,
}

impl SubscriptionLike for SingleSubscription {
  fn unsubscribe(&mut self) { self.closed = true; }

  fn is_closed(&self) -> bool { self.closed }
}

impl<S: SubscriptionLike> SubscriptionLike for Option<S> {
  fn unsubscribe(&mut self) {
    if let Some(s) = self {
      s.unsubscribe();
    }
    *self = None;
  }

  fn is_closed(&self) -> bool {
    self.as_ref().map_or(true, |s| s.is_closed())
  }
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxSubscription; 1]>,
}

/// The clonable subscription cell a whole pipeline shares.
///
/// Every stage with resources to release (a pending timer, an inner
/// subscription) registers them here via [`add`](SharedSubscription::add);
/// closing the cell from any clone cancels all of them.
pub struct SharedSubscription(Arc<Mutex<Inner>>);

impl Default for SharedSubscription {
  fn default() -> Self {
    SharedSubscription(Arc::new(Mutex::new(Inner {
      closed: false,
      teardown: SmallVec::new(),
    })))
  }
}

impl Clone for SharedSubscription {
  #[inline]
  fn clone(&self) -> Self { SharedSubscription(self.0.clone()) }
}

impl SharedSubscription {
  /// Register a child teardown. If the cell is already closed the child is
  /// torn down on the spot. Closed children are swept out on every call so
  /// long-lived pipelines do not accumulate spent handles.
  pub fn add<S>(&self, mut subscription: S)
  where
    S: SubscriptionLike + Send + 'static,
  {
    if self.is_same(&subscription) {
      return;
    }
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|s| !s.is_closed());
      inner.teardown.push(Box::new(subscription));
    }
  }

  // A subscription must never hold itself, or teardown would leak the inner
  // cell through the reference cycle.
  fn is_same(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<Self>()
      .map_or(false, |s| Arc::ptr_eq(&self.0, &s.0))
  }
}

impl SubscriptionLike for SharedSubscription {
  fn unsubscribe(&mut self) {
    let teardown = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    // Run teardowns outside the lock: a child may reach back into a clone of
    // this cell.
    for mut child in teardown {
      child.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

/// Wrap a subscription to expose the RAII upgrade without forcing it.
pub struct SubscriptionWrapper<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionWrapper<T> {
  /// Convert to a guard that unsubscribes when dropped.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> {
    SubscriptionGuard(self.0)
  }

  pub fn into_inner(self) -> T { self.0 }
}

impl<T: SubscriptionLike> SubscriptionLike for SubscriptionWrapper<T> {
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe(); }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

/// An RAII guard owning a subscription: going out of scope cancels the
/// stream.
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) { self.0.unsubscribe(); }
}

/// An observer that also carries subscription state. Subjects keep their
/// attached subscribers behind this trait so a closed one can be dropped
/// from the fan-out list.
pub trait Publisher: crate::observer::Observer + SubscriptionLike {}

impl<T> Publisher for T where T: crate::observer::Observer + SubscriptionLike {}
