//! Subject factories
//!
//! `Local` and `Shared` are marker types that pick the execution scope of the
//! subjects they build:
//!
//! | Factory | Subjects | Observers |
//! |---------|----------|-----------|
//! | [`Local`] | `Rc` based, not `Send` | may borrow from the stack |
//! | [`Shared`] | `Arc` + reentrant mutex, `Send + Sync` | must be `Send` |
//!
//! ```rust
//! use rxsubject::prelude::*;
//!
//! let subject = Local::behavior_subject::<_, ()>(0);
//! subject.subscribe(|v| println!("local: {v}"));
//! subject.next(1);
//!
//! let subject = Shared::replay_subject::<&str, ()>();
//! subject.next("kept");
//! std::thread::spawn(move || {
//!   subject.subscribe(|v| println!("shared: {v}"));
//! })
//! .join()
//! .unwrap();
//! ```

use crate::subject::{
  LocalAsyncSubject, LocalBehaviorSubject, LocalPublishSubject, LocalReplaySubject,
  SharedAsyncSubject, SharedBehaviorSubject, SharedPublishSubject, SharedReplaySubject,
};

/// Factory for single-threaded subjects.
#[derive(Clone, Copy, Debug, Default)]
pub struct Local;

/// Factory for thread-safe subjects.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shared;

impl Local {
  /// Forwards only emissions made after a subscriber joins.
  pub fn publish_subject<'a, Item, Err>() -> LocalPublishSubject<'a, Item, Err> {
    LocalPublishSubject::new()
  }

  /// Hands the latest value (initially `seed`) to every new subscriber.
  pub fn behavior_subject<'a, Item, Err>(seed: Item) -> LocalBehaviorSubject<'a, Item, Err> {
    LocalBehaviorSubject::new(seed)
  }

  /// Replays the full history to every new subscriber.
  pub fn replay_subject<'a, Item, Err>() -> LocalReplaySubject<'a, Item, Err> {
    LocalReplaySubject::new()
  }

  /// Replays the latest `capacity` values to every new subscriber.
  pub fn replay_subject_with_capacity<'a, Item, Err>(
    capacity: usize,
  ) -> LocalReplaySubject<'a, Item, Err> {
    LocalReplaySubject::with_capacity(capacity)
  }

  /// Emits the last value, and only on completion.
  pub fn async_subject<'a, Item, Err>() -> LocalAsyncSubject<'a, Item, Err> {
    LocalAsyncSubject::new()
  }
}

impl Shared {
  /// Thread-safe [`Local::publish_subject`].
  pub fn publish_subject<'a, Item, Err>() -> SharedPublishSubject<'a, Item, Err> {
    SharedPublishSubject::new()
  }

  /// Thread-safe [`Local::behavior_subject`].
  pub fn behavior_subject<'a, Item, Err>(seed: Item) -> SharedBehaviorSubject<'a, Item, Err> {
    SharedBehaviorSubject::new(seed)
  }

  /// Thread-safe [`Local::replay_subject`].
  pub fn replay_subject<'a, Item, Err>() -> SharedReplaySubject<'a, Item, Err> {
    SharedReplaySubject::new()
  }

  /// Thread-safe [`Local::replay_subject_with_capacity`].
  pub fn replay_subject_with_capacity<'a, Item, Err>(
    capacity: usize,
  ) -> SharedReplaySubject<'a, Item, Err> {
    SharedReplaySubject::with_capacity(capacity)
  }

  /// Thread-safe [`Local::async_subject`].
  pub fn async_subject<'a, Item, Err>() -> SharedAsyncSubject<'a, Item, Err> {
    SharedAsyncSubject::new()
  }
}
