use crate::prelude::*;

/// Emit a single value, then complete.
pub fn of<Item>(value: Item) -> OfObservable<Item> { OfObservable(value) }

pub struct OfObservable<Item>(Item);

impl<Item> Observable for OfObservable<Item> {
  type Item = Item;
  type Err = ();
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = ()> + Send + 'static,
  {
    subscriber.next(self.0);
    subscriber.complete();
    SingleSubscription::default()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_once_and_completes() {
    let seen = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(false));
    let s = seen.clone();
    let c = completed.clone();
    observable::of(42).subscribe_all(
      move |v| s.lock().unwrap().push(v),
      |_| {},
      move || *c.lock().unwrap() = true,
    );
    assert_eq!(*seen.lock().unwrap(), vec![42]);
    assert!(*completed.lock().unwrap());
  }
}
