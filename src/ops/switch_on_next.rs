use crate::prelude::*;
use std::marker::PhantomData;
use tracing::trace;

/// Flattens an observable of observables, keeping only the most recent
/// inner observable live.
///
/// Each outer value supersedes the previous inner: its subscription is
/// cancelled, aborting in-flight work, and any value it emits afterwards is
/// discarded at its own subscriber gate. At most one inner subscription is
/// active at any time. An inner failure is dropped and the outer stream
/// keeps running; an outer failure is terminal.
pub struct SwitchOnNextOp<S> {
  pub(crate) source: S,
}

impl<S, Inner> Observable for SwitchOnNextOp<S>
where
  S: Observable<Item = Inner, Err = Inner::Err>,
  Inner: Observable + Send + 'static,
  Inner::Err: 'static,
{
  type Item = Inner::Item;
  type Err = Inner::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item = Inner::Item, Err = Inner::Err> + Send + 'static,
  {
    let Subscriber {
      observer,
      subscription,
    } = subscriber;
    self.source.actual_subscribe(Subscriber {
      observer: SwitchOuterObserver {
        observer: MutArc::own(observer),
        subscription: subscription.clone(),
        current: MutArc::own(None),
        _marker: PhantomData,
      },
      subscription,
    })
  }
}

pub struct SwitchOuterObserver<O, Inner> {
  observer: MutArc<O>,
  /// The chain subscription; every live inner link is registered here so
  /// cancelling the pipeline cancels the inner work too.
  subscription: SharedSubscription,
  current: MutArc<Option<SharedSubscription>>,
  _marker: PhantomData<Inner>,
}

impl<O, Inner> Observer for SwitchOuterObserver<O, Inner>
where
  Inner: Observable + Send + 'static,
  O: Observer<Item = Inner::Item, Err = Inner::Err> + Send + 'static,
{
  type Item = Inner;
  type Err = Inner::Err;

  fn next(&mut self, inner: Inner) {
    if let Some(mut superseded) = self.current.rc_deref_mut().take() {
      trace!("switch_on_next: superseding the active inner stream");
      superseded.unsubscribe();
    }
    let link = SharedSubscription::default();
    *self.current.rc_deref_mut() = Some(link.clone());
    self.subscription.add(link.clone());
    let unsub = inner.actual_subscribe(Subscriber {
      observer: SwitchInnerObserver {
        observer: self.observer.clone(),
      },
      subscription: link.clone(),
    });
    link.add(unsub);
  }

  fn error(&mut self, err: Self::Err) {
    if let Some(mut active) = self.current.rc_deref_mut().take() {
      active.unsubscribe();
    }
    self.observer.rc_deref_mut().error(err);
  }

  fn complete(&mut self) {
    if let Some(mut active) = self.current.rc_deref_mut().take() {
      active.unsubscribe();
    }
    self.observer.rc_deref_mut().complete();
  }
}

pub struct SwitchInnerObserver<O> {
  observer: MutArc<O>,
}

impl<O: Observer> Observer for SwitchInnerObserver<O> {
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    self.observer.rc_deref_mut().next(value);
  }

  // An inner failure only retires this inner stream; the pipeline keeps
  // waiting for the next outer value. The subscriber gate has already
  // closed this link and cancelled its resources.
  fn error(&mut self, _err: Self::Err) {
    trace!("switch_on_next: inner stream failed, awaiting the next one");
  }

  // The outer stream decides when downstream completes.
  fn complete(&mut self) {}
}
