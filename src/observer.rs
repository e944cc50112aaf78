use std::marker::PhantomData;

/// The receiving half of a stream: a sequence of `next` calls optionally
/// terminated by exactly one `error` or `complete`.
///
/// After a terminal signal an observer must not be called again; the
/// [`Subscriber`](crate::subscriber::Subscriber) wrapper enforces this at the
/// subscription boundary, so observer implementations themselves can stay
/// simple.
pub trait Observer {
  type Item;
  type Err;
  fn next(&mut self, value: Self::Item);
  fn error(&mut self, err: Self::Err);
  fn complete(&mut self);
}

impl<T> Observer for Box<T>
where
  T: Observer + ?Sized,
{
  type Item = T::Item;
  type Err = T::Err;
  #[inline]
  fn next(&mut self, value: Self::Item) { (**self).next(value); }
  #[inline]
  fn error(&mut self, err: Self::Err) { (**self).error(err); }
  #[inline]
  fn complete(&mut self) { (**self).complete(); }
}

/// Closure adapter behind `subscribe`: reacts to values only. An error
/// reaching it is a bug in the pipeline the caller built, so it panics.
pub struct NextObserver<N, Item, Err> {
  pub(crate) next: N,
  pub(crate) _marker: PhantomData<(Item, Err)>,
}

impl<N, Item, Err> Observer for NextObserver<N, Item, Err>
where
  N: FnMut(Item),
{
  type Item = Item;
  type Err = Err;
  fn next(&mut self, value: Item) { (self.next)(value); }
  fn error(&mut self, _err: Err) {
    panic!(
      "an unhandled error reached `subscribe`; use `subscribe_err` or \
       `subscribe_all` to observe errors"
    );
  }
  fn complete(&mut self) {}
}

/// Closure adapter behind `subscribe_err` and `subscribe_all`.
pub struct AllObserver<N, E, C, Item, Err> {
  pub(crate) next: N,
  pub(crate) error: E,
  pub(crate) complete: C,
  pub(crate) _marker: PhantomData<(Item, Err)>,
}

impl<N, E, C, Item, Err> Observer for AllObserver<N, E, C, Item, Err>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  type Item = Item;
  type Err = Err;
  fn next(&mut self, value: Item) { (self.next)(value); }
  fn error(&mut self, err: Err) { (self.error)(err); }
  fn complete(&mut self) { (self.complete)(); }
}
