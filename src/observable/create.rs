use crate::prelude::*;
use std::marker::PhantomData;

/// Build an observable from a function that drives an observer by hand.
///
/// The function runs once per subscribe. Deliveries it makes after the
/// subscription closes are discarded by the subscriber gate, so it may keep
/// emitting without checking.
pub fn create<F, Item, Err>(subscribe: F) -> CreateObservable<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item = Item, Err = Err>),
{
  CreateObservable {
    subscribe,
    _marker: PhantomData,
  }
}

pub struct CreateObservable<F, Item, Err> {
  subscribe: F,
  _marker: PhantomData<(Item, Err)>,
}

impl<F, Item, Err> Observable for CreateObservable<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item = Item, Err = Err>),
{
  type Item = Item;
  type Err = Err;
  type Unsub = SharedSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let subscription = subscriber.subscription.clone();
    (self.subscribe)(&mut subscriber);
    subscription
  }
}
