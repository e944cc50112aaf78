use crate::prelude::*;
use std::marker::PhantomData;
use std::time::Duration;

/// Emit `value` after `delay` on `scheduler`, then complete.
///
/// Cancelling the subscription before the delay elapses aborts the scheduled
/// task, so nothing is ever delivered. This is the building block for
/// modelling a cancellable asynchronous request.
pub fn timer<Item, Err, SD>(
  value: Item,
  delay: Duration,
  scheduler: SD,
) -> TimerObservable<Item, Err, SD> {
  TimerObservable {
    value,
    delay,
    scheduler,
    _marker: PhantomData,
  }
}

pub struct TimerObservable<Item, Err, SD> {
  value: Item,
  delay: Duration,
  scheduler: SD,
  _marker: PhantomData<Err>,
}

impl<Item, Err, SD> Observable for TimerObservable<Item, Err, SD>
where
  Item: Send + 'static,
  Err: Send + 'static,
  SD: Scheduler,
{
  type Item = Item;
  type Err = Err;
  type Unsub = SpawnHandle;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> SpawnHandle
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let TimerObservable {
      value,
      delay,
      scheduler,
      ..
    } = self;
    let mut subscriber = subscriber;
    scheduler.schedule(
      move || {
        subscriber.next(value);
        subscriber.complete();
      },
      Some(delay),
    )
  }
}
