use super::{
  policy::AsyncLast,
  subject_core::{LocalCore, SharedCore, Subject, SubjectCore},
};

/// Single-threaded subject that emits only its last value, and only once it
/// completes. Subscribers joining after completion get that value and the
/// completion; an error discards the value.
pub type LocalAsyncSubject<'a, Item, Err> = Subject<LocalCore<'a, Item, Err, AsyncLast<Item>>>;

/// Thread-safe [`LocalAsyncSubject`].
pub type SharedAsyncSubject<'a, Item, Err> = Subject<SharedCore<'a, Item, Err, AsyncLast<Item>>>;

impl<Item, Err> LocalAsyncSubject<'_, Item, Err> {
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(AsyncLast::default())) }
}

impl<Item, Err> Default for LocalAsyncSubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> SharedAsyncSubject<'_, Item, Err> {
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(AsyncLast::default())) }
}

impl<Item, Err> Default for SharedAsyncSubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}
