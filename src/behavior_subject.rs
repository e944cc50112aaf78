use crate::prelude::*;
use std::sync::{Arc, Mutex};

/// A [`Subject`] that doubles as a current-value cell: it always holds the
/// latest value pushed into it, and a new subscriber receives that value at
/// subscribe time before any later emission.
///
/// Writing the field and emitting the change are the same call: `next`.
pub struct BehaviorSubject<Item, Err> {
  subject: Subject<Item, Err>,
  value: Arc<Mutex<Item>>,
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    BehaviorSubject {
      subject: Subject::new(),
      value: Arc::new(Mutex::new(initial)),
    }
  }
}

impl<Item: Clone, Err> BehaviorSubject<Item, Err> {
  /// Read the current value without subscribing.
  pub fn value(&self) -> Item { self.value.lock().unwrap().clone() }
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self {
    BehaviorSubject {
      subject: self.subject.clone(),
      value: self.value.clone(),
    }
  }
}

impl<Item, Err> Observer for BehaviorSubject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if self.subject.is_stopped() {
      return;
    }
    *self.value.lock().unwrap() = value.clone();
    self.subject.next(value);
  }

  fn error(&mut self, err: Err) { self.subject.error(err); }

  fn complete(&mut self) { self.subject.complete(); }
}

impl<Item, Err> Observable for BehaviorSubject<Item, Err>
where
  Item: Clone,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    if !self.subject.is_stopped() {
      subscriber.next(self.value.lock().unwrap().clone());
    }
    self.subject.actual_subscribe(subscriber)
  }
}

impl<Item, Err> SubscriptionLike for BehaviorSubject<Item, Err> {
  fn unsubscribe(&mut self) { self.subject.unsubscribe(); }

  fn is_closed(&self) -> bool { self.subject.is_closed() }
}
