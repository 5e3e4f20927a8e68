use super::subject_core::SubjectCore;
use crate::{log::log_trace, rc::RcDeref, subscription::Subscription};

/// Subscription handle for a Subject.
///
/// Holds a shared pointer to the subject's state and the id of its observer,
/// not a borrow of the subject. Clones refer to the same observer, so
/// unsubscribing through several of them is harmless.
///
/// # Type Parameters
///
/// - `P`: the subject's pointer type (`LocalCore` or `SharedCore`).
pub struct SubjectSubscription<P> {
  pub(crate) core: P,
  pub(crate) id: usize,
}

impl<P> SubjectSubscription<P> {
  pub(crate) fn new(core: P, id: usize) -> Self { Self { core, id } }
}

impl<P: Clone> Clone for SubjectSubscription<P> {
  fn clone(&self) -> Self { Self { core: self.core.clone(), id: self.id } }
}

impl<P, Item, Err, O, Pol> Subscription for SubjectSubscription<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Pol>>,
{
  fn unsubscribe(self) {
    let guard = self.core.rc_deref();
    let removed = guard.borrow_mut().cancel(self.id);
    if removed.is_some() {
      log_trace!(id = self.id, "subject unsubscribe");
    }
    // The observer may own subscriptions of its own; drop it only once the
    // borrow is released.
    drop(removed);
  }

  fn is_closed(&self) -> bool { !self.core.rc_deref().borrow().is_registered(self.id) }
}
