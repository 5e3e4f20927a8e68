use super::{
  policy::Replay,
  subject_core::{LocalCore, SharedCore, Subject, SubjectCore},
};
use crate::rc::RcDeref;

/// Single-threaded subject that records every value and replays the history
/// to each new subscriber, followed by the terminal signal if there is one.
pub type LocalReplaySubject<'a, Item, Err> = Subject<LocalCore<'a, Item, Err, Replay<Item>>>;

/// Thread-safe [`LocalReplaySubject`].
pub type SharedReplaySubject<'a, Item, Err> = Subject<SharedCore<'a, Item, Err, Replay<Item>>>;

impl<Item, Err> LocalReplaySubject<'_, Item, Err> {
  /// Keeps the full history.
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(Replay::new())) }

  /// Keeps only the latest `capacity` values.
  pub fn with_capacity(capacity: usize) -> Self {
    Subject::from_core(SubjectCore::new(Replay::with_capacity(capacity)))
  }
}

impl<Item, Err> Default for LocalReplaySubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> SharedReplaySubject<'_, Item, Err> {
  /// Keeps the full history.
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(Replay::new())) }

  /// Keeps only the latest `capacity` values.
  pub fn with_capacity(capacity: usize) -> Self {
    Subject::from_core(SubjectCore::new(Replay::with_capacity(capacity)))
  }
}

impl<Item, Err> Default for SharedReplaySubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<P, Item, Err, O> Subject<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Replay<Item>>>,
  Item: Clone,
{
  /// Snapshot of the values a new subscriber would be replayed.
  pub fn buffered(&self) -> Vec<Item> {
    self.core.rc_deref().borrow().policy.buffer.iter().cloned().collect()
  }
}
