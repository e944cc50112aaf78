//! A typeahead search box driven over virtual time.
//!
//! Keystrokes land in a current-value cell; the pipeline throttles them,
//! skips duplicates, fires a mock search request per surviving query and
//! keeps only the newest request alive. Results hop to the "main" context
//! and are assigned into the search box state.
//!
//! Run with `cargo run --example typeahead`.

use rillet::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct SearchBox {
  results: String,
}

fn search(query: String, background: ManualScheduler) -> BoxObservable<String, ()> {
  // Shorter queries answer slower, so an early request can only win if no
  // newer one superseded it.
  let latency = Duration::from_millis(1100 - 100 * query.len().min(10) as u64);
  observable::timer(format!("results for '{query}'"), latency, background)
    .box_it()
}

fn main() {
  let background = ManualScheduler::now();
  let main_loop = ManualScheduler::now();
  let search_box = Arc::new(Mutex::new(SearchBox::default()));
  let mut query = BehaviorSubject::<String, ()>::new("r".to_owned());

  let service_scheduler = background.clone();
  let _subscription = query
    .clone()
    .throttle_latest(Duration::from_millis(500), background.clone())
    .distinct_until_changed()
    .map(move |q| search(q, service_scheduler.clone()))
    .switch_on_next()
    .observe_on(main_loop.clone())
    .assign(&search_box, |state, results| {
      println!("    -> search box now shows: {results}");
      state.results = results;
    });

  let keystrokes: &[(u64, &str)] =
    &[(50, "ru"), (120, "rus"), (600, "rus"), (650, "rust")];

  let mut t = 0u64;
  for &(at, text) in keystrokes {
    while t < at {
      t += 50;
      background.advance(Duration::from_millis(50));
      background.run_tasks();
      main_loop.advance(Duration::from_millis(50));
      main_loop.run_tasks();
    }
    println!("{t:>5}ms  typed: {text}");
    query.next(text.to_owned());
  }

  // Let the throttle flush and the last request respond.
  while t < 2500 {
    t += 50;
    background.advance(Duration::from_millis(50));
    background.run_tasks();
    main_loop.advance(Duration::from_millis(50));
    main_loop.run_tasks();
  }

  println!(
    "final: {:?} (current query: {:?})",
    search_box.lock().unwrap().results,
    query.value()
  );
}
