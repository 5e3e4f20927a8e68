use super::{
  policy::Behavior,
  subject_core::{LocalCore, SharedCore, Subject, SubjectCore},
};
use crate::rc::RcDeref;

/// Single-threaded subject that remembers its latest value (starting with a
/// seed) and hands it to every new subscriber.
pub type LocalBehaviorSubject<'a, Item, Err> = Subject<LocalCore<'a, Item, Err, Behavior<Item>>>;

/// Thread-safe [`LocalBehaviorSubject`].
pub type SharedBehaviorSubject<'a, Item, Err> =
  Subject<SharedCore<'a, Item, Err, Behavior<Item>>>;

impl<Item, Err> LocalBehaviorSubject<'_, Item, Err> {
  pub fn new(seed: Item) -> Self { Subject::from_core(SubjectCore::new(Behavior::new(seed))) }
}

impl<Item, Err> SharedBehaviorSubject<'_, Item, Err> {
  pub fn new(seed: Item) -> Self { Subject::from_core(SubjectCore::new(Behavior::new(seed))) }
}

impl<P, Item, Err, O> Subject<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Behavior<Item>>>,
  Item: Clone,
{
  /// The latest value, or the seed if nothing was emitted yet. Still readable
  /// after the subject terminated.
  pub fn value(&self) -> Item { self.core.rc_deref().borrow().policy.value.clone() }
}
