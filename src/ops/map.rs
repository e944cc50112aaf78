use crate::prelude::*;
use std::marker::PhantomData;

pub struct MapOp<S, F, B> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _marker: PhantomData<B>,
}

impl<S, F, B> Observable for MapOp<S, F, B>
where
  S: Observable,
  F: FnMut(S::Item) -> B + Send + 'static,
  S::Item: Send + 'static,
{
  type Item = B;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = B, Err = S::Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    self.source.actual_subscribe(Subscriber {
      observer: MapObserver {
        observer,
        func: self.func,
        _marker: PhantomData,
      },
      subscription,
    })
  }
}

pub struct MapObserver<O, F, Item> {
  observer: O,
  func: F,
  _marker: PhantomData<Item>,
}

impl<O, F, Item> Observer for MapObserver<O, F, Item>
where
  O: Observer,
  F: FnMut(Item) -> O::Item,
{
  type Item = Item;
  type Err = O::Err;

  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)); }

  fn error(&mut self, err: Self::Err) { self.observer.error(err); }

  fn complete(&mut self) { self.observer.complete(); }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use bencher::{benchmark_group, Bencher};
  use std::sync::{Arc, Mutex};

  #[test]
  fn transforms_values() {
    let seen = Arc::new(Mutex::new(vec![]));
    let s = seen.clone();
    observable::from_iter(["a", "ab", "abc"])
      .map(|q| q.len())
      .subscribe(move |v| s.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn forwards_errors_untouched() {
    let errs = Arc::new(Mutex::new(vec![]));
    let mut subject = Subject::<i32, &str>::new();
    let e = errs.clone();
    subject
      .clone()
      .map(|v| v * 2)
      .subscribe_err(|_| {}, move |err| e.lock().unwrap().push(err));
    subject.next(1);
    subject.error("bad");
    assert_eq!(*errs.lock().unwrap(), vec!["bad"]);
  }

  fn map_bench(b: &mut Bencher) {
    b.iter(|| {
      let total = Arc::new(Mutex::new(0));
      let t = total.clone();
      observable::from_iter(0..1000)
        .map(|v| v + 1)
        .subscribe(move |v| *t.lock().unwrap() += v);
      let sum = *total.lock().unwrap();
      sum
    });
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, map_bench);
}
