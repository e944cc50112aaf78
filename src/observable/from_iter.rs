use crate::prelude::*;

/// Emit every item of an iterator in order, then complete.
pub fn from_iter<I>(iter: I) -> FromIterObservable<I>
where
  I: IntoIterator,
{
  FromIterObservable(iter)
}

pub struct FromIterObservable<I>(I);

impl<I> Observable for FromIterObservable<I>
where
  I: IntoIterator,
{
  type Item = I::Item;
  type Err = ();
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = I::Item, Err = ()> + Send + 'static,
  {
    for value in self.0 {
      if subscriber.is_closed() {
        break;
      }
      subscriber.next(value);
    }
    subscriber.complete();
    SingleSubscription::default()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_in_order() {
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    observable::from_iter(1..=4).subscribe(move |v| s.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
  }
}
