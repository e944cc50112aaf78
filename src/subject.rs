use crate::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type SubjectObservers<Item, Err> =
  Arc<Mutex<Vec<Box<dyn Publisher<Item = Item, Err = Err> + Send>>>>;

/// A multicast root publisher: values pushed in with `next` fan out
/// synchronously to every attached subscriber, in attachment order.
///
/// `error` and `complete` are terminal; afterwards the subject accepts no
/// more values and completes late subscribers on the spot.
pub struct Subject<Item, Err> {
  pub(crate) observers: SubjectObservers<Item, Err>,
  pub(crate) subscription: SharedSubscription,
  stopped: Arc<AtomicBool>,
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self {
    Subject {
      observers: Arc::new(Mutex::new(vec![])),
      subscription: SharedSubscription::default(),
      stopped: Arc::new(AtomicBool::new(false)),
    }
  }

  pub(crate) fn is_stopped(&self) -> bool {
    self.stopped.load(Ordering::Relaxed)
  }

  /// Subscribers currently attached and not yet closed.
  pub fn subscribed_size(&self) -> usize {
    self
      .observers
      .lock()
      .unwrap()
      .iter()
      .filter(|o| !o.is_closed())
      .count()
  }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self {
    Subject {
      observers: self.observers.clone(),
      subscription: self.subscription.clone(),
      stopped: self.stopped.clone(),
    }
  }
}

impl<Item, Err> Observer for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    if self.is_stopped() {
      return;
    }
    let mut observers = self.observers.lock().unwrap();
    observers.retain_mut(|observer| {
      if observer.is_closed() {
        false
      } else {
        observer.next(value.clone());
        !observer.is_closed()
      }
    });
  }

  fn error(&mut self, err: Err) {
    if self.stopped.swap(true, Ordering::Relaxed) {
      return;
    }
    let mut observers = std::mem::take(&mut *self.observers.lock().unwrap());
    for observer in observers.iter_mut() {
      observer.error(err.clone());
    }
  }

  fn complete(&mut self) {
    if self.stopped.swap(true, Ordering::Relaxed) {
      return;
    }
    let mut observers = std::mem::take(&mut *self.observers.lock().unwrap());
    for observer in observers.iter_mut() {
      observer.complete();
    }
  }
}

impl<Item, Err> Observable for Subject<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    if self.is_stopped() {
      let mut subscriber = subscriber;
      subscriber.complete();
      return subscription;
    }
    self.subscription.add(subscription.clone());
    self.observers.lock().unwrap().push(Box::new(subscriber));
    subscription
  }
}

impl<Item, Err> SubscriptionLike for Subject<Item, Err> {
  fn unsubscribe(&mut self) { self.subscription.unsubscribe(); }

  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
