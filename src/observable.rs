use crate::assign::AssignObserver;
use crate::observer::{AllObserver, NextObserver, Observer};
use crate::ops::distinct_until_changed::{
  DistinctUntilChangedOp, DistinctUntilKeyChangedOp,
};
use crate::ops::map::MapOp;
use crate::ops::observe_on::ObserveOnOp;
use crate::ops::switch_on_next::SwitchOnNextOp;
use crate::ops::throttle::ThrottleLatestOp;
use crate::scheduler::Scheduler;
use crate::subscriber::Subscriber;
use crate::subscription::{
  SharedSubscription, SubscriptionLike, SubscriptionWrapper,
};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod boxed;
pub mod create;
pub mod from_iter;
pub mod of;
pub mod timer;
pub mod trivial;

pub use boxed::{BoxObservable, BoxObserver};
pub use create::create;
pub use from_iter::from_iter;
pub use of::of;
pub use timer::timer;
pub use trivial::{empty, throw};

/// The emitting half of a stream.
///
/// Subscribing consumes the observable; sources that fan out to many
/// subscribers (subjects) are `Clone` and each clone is subscribed once.
/// `actual_subscribe` wires the chain and returns the upstream teardown,
/// which the `subscribe*` terminals fold into the pipeline's
/// [`SharedSubscription`].
pub trait Observable {
  type Item;
  type Err;
  type Unsub: SubscriptionLike + Send + 'static;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static;
}

pub trait ObservableExt: Observable + Sized {
  /// Transform every value with `func`. When `func` returns an inner
  /// observable this builds the observable-of-observables that
  /// [`switch_on_next`](ObservableExt::switch_on_next) flattens.
  fn map<B, F>(self, func: F) -> MapOp<Self, F, B>
  where
    F: FnMut(Self::Item) -> B,
  {
    MapOp {
      source: self,
      func,
      _marker: PhantomData,
    }
  }

  /// Rate-bound the stream to at most one value per `interval`, keeping the
  /// latest value seen while the gate is shut.
  fn throttle_latest<SD>(
    self,
    interval: Duration,
    scheduler: SD,
  ) -> ThrottleLatestOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleLatestOp {
      source: self,
      interval,
      scheduler,
    }
  }

  /// Suppress values equal to the previously seen one.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp { source: self }
  }

  /// Like [`distinct_until_changed`](ObservableExt::distinct_until_changed)
  /// but compares keys derived by `key`, for payloads that are not cheaply
  /// comparable.
  fn distinct_until_key_changed<K, F>(
    self,
    key: F,
  ) -> DistinctUntilKeyChangedOp<Self, F>
  where
    F: FnMut(&Self::Item) -> K,
    K: PartialEq,
  {
    DistinctUntilKeyChangedOp { source: self, key }
  }

  /// Flatten an observable of observables, keeping only the most recent
  /// inner observable subscribed. Subscribing a new inner cancels the
  /// previous one, in-flight work included.
  fn switch_on_next(self) -> SwitchOnNextOp<Self>
  where
    Self::Item: Observable,
  {
    SwitchOnNextOp { source: self }
  }

  /// Re-deliver every signal on `scheduler`, preserving order.
  fn observe_on<SD>(self, scheduler: SD) -> ObserveOnOp<Self, SD>
  where
    SD: Scheduler,
  {
    ObserveOnOp {
      source: self,
      scheduler,
    }
  }

  /// Erase the concrete operator chain behind one nameable type, e.g. for a
  /// service boundary that returns pipelines from a function.
  fn box_it(self) -> BoxObservable<Self::Item, Self::Err>
  where
    Self: Send + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    BoxObservable::new(self)
  }

  /// Subscribe with a value callback. An error reaching this subscriber
  /// panics; use [`subscribe_err`](ObservableExt::subscribe_err) for
  /// fallible pipelines.
  fn subscribe<N>(self, next: N) -> SubscriptionWrapper<SharedSubscription>
  where
    N: FnMut(Self::Item) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let subscription = SharedSubscription::default();
    let observer = NextObserver {
      next,
      _marker: PhantomData,
    };
    let unsub = self.actual_subscribe(Subscriber {
      observer,
      subscription: subscription.clone(),
    });
    subscription.add(unsub);
    SubscriptionWrapper(subscription)
  }

  fn subscribe_err<N, E>(
    self,
    next: N,
    error: E,
  ) -> SubscriptionWrapper<SharedSubscription>
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    self.subscribe_all(next, error, || {})
  }

  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionWrapper<SharedSubscription>
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
    C: FnMut() + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let subscription = SharedSubscription::default();
    let observer = AllObserver {
      next,
      error,
      complete,
      _marker: PhantomData,
    };
    let unsub = self.actual_subscribe(Subscriber {
      observer,
      subscription: subscription.clone(),
    });
    subscription.add(unsub);
    SubscriptionWrapper(subscription)
  }

  /// Terminal subscriber that writes every value into a field of `target`
  /// through `write`. The target is held weakly; once it is dropped the
  /// pipeline tears itself down on the next value.
  fn assign<T, F>(
    self,
    target: &Arc<Mutex<T>>,
    write: F,
  ) -> SubscriptionWrapper<SharedSubscription>
  where
    T: Send + 'static,
    F: FnMut(&mut T, Self::Item) + Send + 'static,
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let subscription = SharedSubscription::default();
    let observer =
      AssignObserver::new(Arc::downgrade(target), write, subscription.clone());
    let unsub = self.actual_subscribe(Subscriber {
      observer,
      subscription: subscription.clone(),
    });
    subscription.add(unsub);
    SubscriptionWrapper(subscription)
  }
}

impl<T: Observable> ObservableExt for T {}
