use crate::prelude::*;

pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<S> Observable for DistinctUntilChangedOp<S>
where
  S: Observable,
  S::Item: PartialEq + Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    self.source.actual_subscribe(Subscriber {
      observer: DistinctUntilChangedObserver {
        observer,
        last: None,
      },
      subscription,
    })
  }
}

pub struct DistinctUntilChangedObserver<O: Observer> {
  observer: O,
  last: Option<O::Item>,
}

impl<O> Observer for DistinctUntilChangedObserver<O>
where
  O: Observer,
  O::Item: PartialEq + Clone,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    // The last-seen value updates on every input, forwarded or not.
    let changed = self.last.as_ref() != Some(&value);
    self.last = Some(value.clone());
    if changed {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) { self.observer.error(err); }

  fn complete(&mut self) { self.observer.complete(); }
}

pub struct DistinctUntilKeyChangedOp<S, F> {
  pub(crate) source: S,
  pub(crate) key: F,
}

impl<S, F, K> Observable for DistinctUntilKeyChangedOp<S, F>
where
  S: Observable,
  S::Item: Send + 'static,
  F: FnMut(&S::Item) -> K + Send + 'static,
  K: PartialEq + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = S::Item, Err = S::Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    self.source.actual_subscribe(Subscriber {
      observer: DistinctUntilKeyChangedObserver {
        observer,
        key: self.key,
        last: None,
      },
      subscription,
    })
  }
}

pub struct DistinctUntilKeyChangedObserver<O, F, K> {
  observer: O,
  key: F,
  last: Option<K>,
}

impl<O, F, K> Observer for DistinctUntilKeyChangedObserver<O, F, K>
where
  O: Observer,
  F: FnMut(&O::Item) -> K,
  K: PartialEq,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    let key = (self.key)(&value);
    let changed = self.last.as_ref() != Some(&key);
    self.last = Some(key);
    if changed {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) { self.observer.error(err); }

  fn complete(&mut self) { self.observer.complete(); }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn suppresses_consecutive_equals_only() {
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    observable::from_iter(['v', 'v', 'v'])
      .distinct_until_changed()
      .subscribe(move |v| s.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec!['v']);

    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    observable::from_iter(['a', 'b', 'a'])
      .distinct_until_changed()
      .subscribe(move |v| s.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec!['a', 'b', 'a']);
  }

  #[test]
  fn first_value_always_forwards() {
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    let mut subject = Subject::<i32, ()>::new();
    subject
      .clone()
      .distinct_until_changed()
      .subscribe(move |v| s.lock().unwrap().push(v));
    subject.next(0);
    assert_eq!(*seen.lock().unwrap(), vec![0]);
  }

  #[test]
  fn compares_by_derived_key() {
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    observable::from_iter(["ab", "cd", "efg"])
      .distinct_until_key_changed(|v: &&str| v.len())
      .subscribe(move |v| s.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec!["ab", "efg"]);
  }
}
