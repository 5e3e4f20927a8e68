//! Example: the four subject policies side by side
//!
//! Each section feeds a subject some values, subscribes part way through and
//! logs what the subscriber actually receives. Run with
//! `cargo run --example subjects --features tracing` to also see the
//! subjects' own lifecycle events.

use rxsubject::prelude::*;
use tracing::{error, info, Level};

// ==================================================================================
// Observer helpers
// ==================================================================================

/// An observer that logs every event under `name`.
fn logger(name: &'static str) -> impl Observer<String, String> {
  ObserverFn::new()
    .on_next(move |v: String| info!(observer = name, "next: {v}"))
    .on_error(move |e: String| error!(observer = name, "error: {e}"))
    .on_complete(move || info!(observer = name, "completed"))
}

// ==================================================================================
// 1. Closures in place of a full observer
// ==================================================================================

fn callbacks() {
  info!("--- callbacks ---");
  let subject = Local::publish_subject::<String, String>();

  // Only `next` matters here, the other signals are ignored.
  subject.subscribe(|v| info!("next only: {v}"));
  subject.subscribe_all(
    |v| info!("all: next {v}"),
    |e| error!("all: error {e}"),
    || info!("all: completed"),
  );

  subject.next("message 1".into());
  subject.next("message 2".into());
  subject.complete();
  // Dropped: the subject is already terminated.
  subject.next("message 3".into());
}

// ==================================================================================
// 2. AsyncSubject: only the last value, only on completion
// ==================================================================================

fn async_subject() {
  info!("--- async subject ---");
  let subject = Local::async_subject::<String, String>();
  subject.subscribe_with(logger("async"));

  subject.next("asyncSubject1".into());
  subject.next("asyncSubject2".into());
  subject.complete();
  subject.next("asyncSubject3".into());

  subject.subscribe_with(logger("async late"));
}

// ==================================================================================
// 3. BehaviorSubject: the latest value, then everything live
// ==================================================================================

fn behavior_subject() {
  info!("--- behavior subject ---");
  let subject = Local::behavior_subject::<String, String>("Normal".into());

  subject.next("behaviorSubject1".into());
  subject.next("behaviorSubject2".into());
  subject.subscribe_with(logger("behavior"));
  subject.next("behaviorSubject3".into());
  subject.next("behaviorSubject4".into());
  info!(value = %subject.value(), "current value");
}

// ==================================================================================
// 4. PublishSubject: only what happens after subscribing
// ==================================================================================

fn publish_subject() {
  info!("--- publish subject ---");
  let subject = Local::publish_subject::<String, String>();

  // No subscriber yet: this value is lost.
  subject.next("publishSubject1".into());
  let first = subject.subscribe(|v| info!(observer = "first", "next: {v}"));
  subject.next("publishSubject2".into());
  let _second = subject
    .subscribe(|v| info!(observer = "second", "next: {v}"))
    .unsubscribe_when_dropped();
  subject.next("publishSubject3".into());

  first.unsubscribe();
  subject.next("publishSubject4".into());
  subject.error("publisher gave up".into());
}

// ==================================================================================
// 5. ReplaySubject: the whole history, whenever you subscribe
// ==================================================================================

fn replay_subject() {
  info!("--- replay subject ---");
  let subject = Local::replay_subject::<String, String>();

  subject.next("replaySubject1".into());
  subject.next("replaySubject2".into());
  subject.subscribe_with(logger("replay"));
  subject.next("replaySubject3".into());
  subject.complete();

  subject.subscribe_with(logger("replay late"));
}

// ==================================================================================
// 6. Shared subjects across threads
// ==================================================================================

fn shared_subject() {
  info!("--- shared replay subject ---");
  let subject = Shared::replay_subject_with_capacity::<String, String>(2);

  let producers: Vec<_> = (0..3)
    .map(|i| {
      let subject = subject.clone();
      std::thread::spawn(move || subject.next(format!("from thread {i}")))
    })
    .collect();
  for p in producers {
    if p.join().is_err() {
      error!("producer thread panicked");
    }
  }

  // Only the two most recent values are kept for late subscribers.
  subject.subscribe(|v| info!(observer = "shared late", "next: {v}"));
  subject.complete();
}

fn main() {
  tracing_subscriber::fmt().with_max_level(Level::TRACE).init();

  callbacks();
  async_subject();
  behavior_subject();
  publish_subject();
  replay_subject();
  shared_subject();
}
