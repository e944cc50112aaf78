use crate::prelude::*;

pub type BoxObserver<Item, Err> =
  Box<dyn Observer<Item = Item, Err = Err> + Send>;

/// An observable with its concrete operator chain erased, so a function can
/// return differently-shaped pipelines under one type. Built via
/// [`ObservableExt::box_it`](crate::observable::ObservableExt::box_it).
pub struct BoxObservable<Item, Err> {
  subscribe:
    Box<dyn FnOnce(Subscriber<BoxObserver<Item, Err>>) -> BoxSubscription + Send>,
}

impl<Item: 'static, Err: 'static> BoxObservable<Item, Err> {
  pub fn new<S>(source: S) -> Self
  where
    S: Observable<Item = Item, Err = Err> + Send + 'static,
  {
    BoxObservable {
      subscribe: Box::new(move |subscriber| {
        Box::new(source.actual_subscribe(subscriber))
      }),
    }
  }
}

impl<Item: 'static, Err: 'static> Observable for BoxObservable<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = BoxSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> BoxSubscription
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    (self.subscribe)(Subscriber {
      observer: Box::new(observer) as BoxObserver<Item, Err>,
      subscription,
    })
  }
}
