//! A minimal reactive-stream pipeline engine.
//!
//! Values pushed into a root publisher flow through a chain of operators to
//! a terminal subscriber, with one shared subscription tying the whole chain
//! together: cancelling it cancels every pending timer and in-flight request
//! the chain owns.
//!
//! The operator set is the one a debounced-search ("typeahead") pipeline
//! needs: [`throttle_latest`](observable::ObservableExt::throttle_latest)
//! rate-bounds the input, [`distinct_until_changed`](observable::ObservableExt::distinct_until_changed)
//! drops echoes, [`map`](observable::ObservableExt::map) calls out to a
//! service returning an inner stream per request,
//! [`switch_on_next`](observable::ObservableExt::switch_on_next) keeps only
//! the newest request alive, and
//! [`observe_on`](observable::ObservableExt::observe_on) hops the results
//! back to the context that owns the target state, where
//! [`assign`](observable::ObservableExt::assign) writes them.
//!
//! ```
//! use rillet::prelude::*;
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::now();
//! let results = Arc::new(Mutex::new(String::new()));
//! let mut query = BehaviorSubject::<String, ()>::new("a".to_owned());
//!
//! let scheduler_for_service = scheduler.clone();
//! query
//!   .clone()
//!   .throttle_latest(Duration::from_millis(500), scheduler.clone())
//!   .distinct_until_changed()
//!   .map(move |q: String| {
//!     observable::timer(
//!       format!("results for {q}"),
//!       Duration::from_millis(100),
//!       scheduler_for_service.clone(),
//!     )
//!     .box_it()
//!   })
//!   .switch_on_next()
//!   .observe_on(scheduler.clone())
//!   .assign(&results, |target, v| *target = v);
//!
//! query.next("ab".to_owned());
//! scheduler.advance_and_run(Duration::from_millis(100), 7);
//! assert_eq!(*results.lock().unwrap(), "results for ab");
//! ```

pub mod assign;
pub mod behavior_subject;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
