pub use crate::behavior_subject::BehaviorSubject;
pub use crate::observable;
pub use crate::observable::{
  BoxObservable, BoxObserver, Observable, ObservableExt,
};
pub use crate::observer::Observer;
pub use crate::ops;
pub use crate::rc::MutArc;
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::shared_pool;
pub use crate::scheduler::{ManualScheduler, Scheduler, SpawnHandle};
pub use crate::subject::Subject;
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{
  BoxSubscription, Publisher, SharedSubscription, SingleSubscription,
  SubscriptionGuard, SubscriptionLike, SubscriptionWrapper,
};
