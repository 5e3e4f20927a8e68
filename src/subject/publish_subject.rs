use super::{
  policy::Publish,
  subject_core::{LocalCore, SharedCore, Subject, SubjectCore},
};

/// Single-threaded subject that forwards only what is emitted after an
/// observer subscribes.
pub type LocalPublishSubject<'a, Item, Err> = Subject<LocalCore<'a, Item, Err, Publish>>;

/// Thread-safe [`LocalPublishSubject`].
pub type SharedPublishSubject<'a, Item, Err> = Subject<SharedCore<'a, Item, Err, Publish>>;

impl<Item, Err> LocalPublishSubject<'_, Item, Err> {
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(Publish)) }
}

impl<Item, Err> Default for LocalPublishSubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> SharedPublishSubject<'_, Item, Err> {
  pub fn new() -> Self { Subject::from_core(SubjectCore::new(Publish)) }
}

impl<Item, Err> Default for SharedPublishSubject<'_, Item, Err> {
  fn default() -> Self { Self::new() }
}
