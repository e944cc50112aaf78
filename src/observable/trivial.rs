use crate::prelude::*;
use std::marker::PhantomData;

/// Complete immediately without emitting.
pub fn empty<Item, Err>() -> EmptyObservable<Item, Err> {
  EmptyObservable(PhantomData)
}

pub struct EmptyObservable<Item, Err>(PhantomData<(Item, Err)>);

impl<Item, Err> Observable for EmptyObservable<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    subscriber.complete();
    SingleSubscription::default()
  }
}

/// Fail immediately with `err`.
pub fn throw<Item, Err>(err: Err) -> ThrowObservable<Item, Err> {
  ThrowObservable {
    err,
    _marker: PhantomData,
  }
}

pub struct ThrowObservable<Item, Err> {
  err: Err,
  _marker: PhantomData<Item>,
}

impl<Item, Err> Observable for ThrowObservable<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    subscriber.error(self.err);
    SingleSubscription::default()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn empty_only_completes() {
    let completed = Arc::new(Mutex::new(false));
    let c = completed.clone();
    observable::empty::<i32, ()>().subscribe_all(
      |_| panic!("empty emitted a value"),
      |_| panic!("empty errored"),
      move || *c.lock().unwrap() = true,
    );
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn throw_only_errors() {
    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    observable::throw::<i32, &str>("boom").subscribe_err(
      |_| panic!("throw emitted a value"),
      move |e| *s.lock().unwrap() = Some(e),
    );
    assert_eq!(*seen.lock().unwrap(), Some("boom"));
  }
}
