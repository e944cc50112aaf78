use crate::observer::Observer;
use crate::subscription::{SharedSubscription, SubscriptionLike};

/// Couples an observer with the pipeline's shared subscription and enforces
/// the delivery contract at that boundary: no `next` after the subscription
/// closes, and a terminal signal closes it.
pub struct Subscriber<O> {
  pub observer: O,
  pub subscription: SharedSubscription,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O) -> Self {
    Subscriber {
      observer,
      subscription: SharedSubscription::default(),
    }
  }
}

impl<O: Observer> Observer for Subscriber<O> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    if !self.subscription.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) {
    if !self.subscription.is_closed() {
      self.subscription.unsubscribe();
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.subscription.is_closed() {
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }
}

impl<O> SubscriptionLike for Subscriber<O> {
  #[inline]
  fn unsubscribe(&mut self) { self.subscription.unsubscribe(); }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
