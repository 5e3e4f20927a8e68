use std::{cell::RefCell, collections::VecDeque};

use super::{
  policy::{Policy, Replayed},
  subject_subscription::SubjectSubscription,
  subscribers::Subscribers,
};
use crate::{
  log::{log_trace, log_warn},
  observer::{BoxedObserver, BoxedObserverSend, IntoBoxedObserver, Noop, Observer, ObserverFn},
  rc::{MutArc, MutRc, RcDeref},
};

// ============================================================================
// Type Aliases for Subject Pointer Types
// ============================================================================

/// Single-threaded subject state: `Rc<RefCell<..>>` holding boxed observers
/// that may borrow from the stack for `'a`.
pub type LocalCore<'a, Item, Err, Pol> =
  MutRc<SubjectCore<Item, Err, BoxedObserver<'a, Item, Err>, Pol>>;

/// Thread-safe subject state: `Arc` + reentrant mutex holding `Send`
/// observers.
pub type SharedCore<'a, Item, Err, Pol> =
  MutArc<SubjectCore<Item, Err, BoxedObserverSend<'a, Item, Err>, Pol>>;

// ============================================================================
// Terminal State
// ============================================================================

/// Lifecycle of a subject. Leaves `Active` at most once; both terminal states
/// are absorbing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TerminalState<Err> {
  #[default]
  Active,
  Completed,
  Errored(Err),
}

impl<Err> TerminalState<Err> {
  #[inline]
  pub fn is_active(&self) -> bool { matches!(self, TerminalState::Active) }

  #[inline]
  pub fn is_terminated(&self) -> bool { !self.is_active() }
}

// ============================================================================
// Subject Core
// ============================================================================

/// Work item for a delivery pass.
pub(crate) enum Command<Item, Err, O> {
  Next(Item),
  Error(Err),
  Complete,
  Subscribe(usize, O),
}

/// The state behind every subject: attached observers, terminal state,
/// buffering policy and the queue of work waiting for the current delivery
/// pass to finish.
pub struct SubjectCore<Item, Err, O, Pol> {
  pub(crate) observers: Subscribers<O>,
  pub(crate) state: TerminalState<Err>,
  pub(crate) policy: Pol,
  dispatching: bool,
  pending: VecDeque<Command<Item, Err, O>>,
}

impl<Item, Err, O, Pol> SubjectCore<Item, Err, O, Pol> {
  pub fn new(policy: Pol) -> Self {
    Self {
      observers: Subscribers::default(),
      state: TerminalState::Active,
      policy,
      dispatching: false,
      pending: VecDeque::new(),
    }
  }

  /// Detach `id`, whether it is attached or still waiting in the queue.
  ///
  /// `None` if `id` was not registered. Otherwise the observer, unless it is
  /// lent out to a running callback, so the caller can drop it outside the
  /// borrow.
  pub(crate) fn cancel(&mut self, id: usize) -> Option<Option<O>> {
    if let Some(slot) = self.observers.remove(id) {
      return Some(slot);
    }
    let pos = self
      .pending
      .iter()
      .position(|cmd| matches!(cmd, Command::Subscribe(pending, _) if *pending == id))?;
    match self.pending.remove(pos) {
      Some(Command::Subscribe(_, observer)) => Some(Some(observer)),
      _ => None,
    }
  }

  /// Whether `id` can still receive callbacks.
  pub(crate) fn is_registered(&self, id: usize) -> bool {
    self.observers.contains(id)
      || self
        .pending
        .iter()
        .any(|cmd| matches!(cmd, Command::Subscribe(pending, _) if *pending == id))
  }

  fn push(&mut self, cmd: Command<Item, Err, O>) -> bool {
    self.pending.push_back(cmd);
    !std::mem::replace(&mut self.dispatching, true)
  }

  fn pop(&mut self) -> Option<Command<Item, Err, O>> {
    let cmd = self.pending.pop_front();
    if cmd.is_none() {
      self.dispatching = false;
    }
    cmd
  }
}

// ============================================================================
// Subject
// ============================================================================

/// Subject: a hot multicast point that is fed by a producer and fans out to
/// every attached observer.
///
/// The pointer type `P` picks the execution scope ([`LocalCore`] or
/// [`SharedCore`]); the policy inside the core picks the flavour (publish,
/// behavior, replay, async). `Subject` is a cheap handle: clones share the
/// same state.
///
/// # Delivery
///
/// `next`, `error` and `complete` deliver synchronously, in subscription
/// order, and return once every observer has been called.
///
/// # Re-Entrancy Policy
///
/// - `next`/`error`/`complete`/`subscribe` called on a subject from inside one
///   of its own callbacks are queued and run, in call order, right after the
///   current delivery pass. A subscriber added this way never sees the
///   emission that was in progress.
/// - `unsubscribe` from inside a callback applies immediately: the cancelled
///   observer gets nothing further, even later in the same pass.
///
/// Feeding a subject back into itself loops forever, as every emission queues
/// the next one.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let subject = Local::publish_subject::<i32, ()>();
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// // Re-entrant emission: queued until the current pass is over.
/// subject.subscribe({
///   let subject = subject.clone();
///   let seen = seen.clone();
///   move |v| {
///     seen.borrow_mut().push(v);
///     if v == 1 {
///       subject.next(2);
///     }
///   }
/// });
///
/// subject.next(1);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct Subject<P> {
  pub(crate) core: P,
}

impl<P: Clone> Clone for Subject<P> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<P> Subject<P> {
  pub(crate) fn from_core<T>(core: T) -> Self
  where
    P: From<T>,
  {
    Self { core: P::from(core) }
  }
}

impl<P, Item, Err, O, Pol> Subject<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Pol>>,
{
  /// Number of attached observers.
  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().borrow().observers.len() }

  /// Check if there are no attached observers.
  pub fn is_empty(&self) -> bool { self.core.rc_deref().borrow().observers.is_empty() }

  /// Returns `true` once the subject has completed or errored.
  pub fn is_closed(&self) -> bool { self.core.rc_deref().borrow().state.is_terminated() }

  /// Current lifecycle state.
  pub fn state(&self) -> TerminalState<Err>
  where
    Err: Clone,
  {
    self.core.rc_deref().borrow().state.clone()
  }
}

impl<P, Item, Err, O, Pol> Subject<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Pol>> + Clone,
  O: Observer<Item, Err>,
  Pol: Policy<Item>,
  Item: Clone,
  Err: Clone,
{
  /// Emit a value. Dropped silently once the subject has terminated.
  pub fn next(&self, value: Item) { self.run(Command::Next(value)) }

  /// Terminate with `err`. Only the first terminal call has an effect.
  pub fn error(&self, err: Err) { self.run(Command::Error(err)) }

  /// Terminate normally. Only the first terminal call has an effect.
  pub fn complete(&self) { self.run(Command::Complete) }

  /// Subscribe with a `next` callback only.
  pub fn subscribe<F>(&self, next: F) -> SubjectSubscription<P>
  where
    F: FnMut(Item),
    ObserverFn<F, Noop, Noop>: IntoBoxedObserver<O>,
  {
    self.subscribe_with(ObserverFn::new().on_next(next))
  }

  /// Subscribe with all three callbacks.
  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> SubjectSubscription<P>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    ObserverFn<N, E, C>: IntoBoxedObserver<O>,
  {
    self.subscribe_with(ObserverFn::new().on_next(next).on_error(error).on_complete(complete))
  }

  /// Subscribe any [`Observer`].
  ///
  /// The observer first receives whatever the policy replays, then live
  /// emissions. On a terminated subject it receives the replay and the
  /// terminal signal, and the returned subscription is already closed.
  pub fn subscribe_with<T>(&self, observer: T) -> SubjectSubscription<P>
  where
    T: IntoBoxedObserver<O>,
  {
    let observer = observer.into_boxed();
    let guard = self.core.rc_deref();
    let id = guard.borrow_mut().observers.reserve_id();
    log_trace!(id, "subject subscribe");
    dispatch(&guard, Command::Subscribe(id, observer));
    SubjectSubscription::new(self.core.clone(), id)
  }

  /// An [`Observer`] that forwards every event into this subject, for
  /// chaining one subject onto another.
  pub fn observer(&self) -> SubjectObserver<P> { SubjectObserver(self.clone()) }

  fn run(&self, cmd: Command<Item, Err, O>) {
    let guard = self.core.rc_deref();
    dispatch(&guard, cmd);
  }
}

/// Observer view of a [`Subject`], see [`Subject::observer`].
pub struct SubjectObserver<P>(Subject<P>);

impl<P: Clone> Clone for SubjectObserver<P> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<P, Item, Err, O, Pol> Observer<Item, Err> for SubjectObserver<P>
where
  P: RcDeref<Target = SubjectCore<Item, Err, O, Pol>> + Clone,
  O: Observer<Item, Err>,
  Pol: Policy<Item>,
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) { self.0.next(value) }

  fn error(self, err: Err) { self.0.error(err) }

  fn complete(self) { self.0.complete() }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

// ============================================================================
// Delivery Pass
// ============================================================================

type Cell<Item, Err, O, Pol> = RefCell<SubjectCore<Item, Err, O, Pol>>;

/// Queue `cmd` and, unless a pass is already running further up the stack,
/// run a pass until the queue is empty.
///
/// The `RefCell` is only borrowed between callbacks, never across one, so
/// callbacks are free to subscribe, unsubscribe or emit.
fn dispatch<Item, Err, O, Pol>(cell: &Cell<Item, Err, O, Pol>, cmd: Command<Item, Err, O>)
where
  O: Observer<Item, Err>,
  Pol: Policy<Item>,
  Item: Clone,
  Err: Clone,
{
  if !cell.borrow_mut().push(cmd) {
    return;
  }
  let pass = Pass(cell);
  loop {
    let Some(cmd) = cell.borrow_mut().pop() else { break };
    match cmd {
      Command::Next(value) => pass.next(value),
      Command::Error(err) => pass.error(err),
      Command::Complete => pass.complete(),
      Command::Subscribe(id, observer) => pass.subscribe(id, observer),
    }
  }
}

struct Pass<'c, Item, Err, O, Pol>(&'c Cell<Item, Err, O, Pol>);

impl<Item, Err, O, Pol> Pass<'_, Item, Err, O, Pol>
where
  O: Observer<Item, Err>,
  Pol: Policy<Item>,
  Item: Clone,
  Err: Clone,
{
  fn next(&self, value: Item) {
    let fan_out = {
      let mut core = self.0.borrow_mut();
      let core = &mut *core;
      if core.state.is_terminated() {
        return;
      }
      core
        .policy
        .record(value)
        .map(|value| (core.observers.ids(), value))
    };
    if let Some((ids, value)) = fan_out {
      self.broadcast_value(ids, value);
    }
  }

  fn error(&self, err: Err) {
    let observers = {
      let mut core = self.0.borrow_mut();
      if core.state.is_terminated() {
        return;
      }
      core.state = TerminalState::Errored(err.clone());
      core.policy.discard();
      core.observers.drain()
    };
    log_trace!(observers = observers.len(), "subject errored");

    let mut iter = observers.into_iter().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }

  fn complete(&self) {
    let flush = {
      let mut core = self.0.borrow_mut();
      let core = &mut *core;
      if core.state.is_terminated() {
        return;
      }
      core
        .policy
        .flush()
        .map(|value| (core.observers.ids(), value))
    };
    // Re-entrant work queued by these callbacks runs after the completion
    // below, so it finds the subject terminated.
    if let Some((ids, value)) = flush {
      self.broadcast_value(ids, value);
    }

    let observers = {
      let mut core = self.0.borrow_mut();
      core.state = TerminalState::Completed;
      core.observers.drain()
    };
    log_trace!(observers = observers.len(), "subject completed");
    for observer in observers {
      observer.complete();
    }
  }

  fn subscribe(&self, id: usize, mut observer: O) {
    let replay: Replayed<Item> = {
      let mut core = self.0.borrow_mut();
      core.observers.insert_vacant(id);
      core.policy.replay(&core.state)
    };

    for value in replay {
      if !self.0.borrow().observers.contains(id) {
        break;
      }
      observer.next(value);
    }

    let mut core = self.0.borrow_mut();
    if !core.observers.contains(id) {
      drop(core);
      return;
    }
    let state = core.state.clone();
    match state {
      TerminalState::Active => {
        let closed = observer.is_closed();
        let rejected = core.observers.restore(id, observer, closed);
        drop(core);
        drop(rejected);
      }
      TerminalState::Completed => {
        core.observers.remove(id);
        drop(core);
        observer.complete();
      }
      TerminalState::Errored(err) => {
        core.observers.remove(id);
        drop(core);
        observer.error(err);
      }
    }
  }

  /// Deliver `value` to the observers in `ids`, cloning for all but the last
  /// one, which receives the moved value.
  fn broadcast_value(&self, ids: smallvec::SmallVec<[usize; 4]>, value: Item) {
    let mut iter = ids.into_iter().peekable();
    while let Some(id) = iter.next() {
      if iter.peek().is_some() {
        self.deliver(id, value.clone());
      } else {
        self.deliver(id, value);
        break;
      }
    }
  }

  fn deliver(&self, id: usize, value: Item) {
    let Some(mut observer) = self.0.borrow_mut().observers.lend(id) else { return };
    observer.next(value);
    let closed = observer.is_closed();
    let rejected = self.0.borrow_mut().observers.restore(id, observer, closed);
    drop(rejected);
  }
}

impl<Item, Err, O, Pol> Drop for Pass<'_, Item, Err, O, Pol> {
  fn drop(&mut self) {
    if !std::thread::panicking() {
      return;
    }
    // A callback panicked mid-pass: reopen the subject and throw away the
    // queued work and the slot of the observer that was lent out.
    let Ok(mut core) = self.0.try_borrow_mut() else { return };
    core.dispatching = false;
    core.observers.prune_vacant();
    let abandoned = std::mem::take(&mut core.pending);
    drop(core);
    log_warn!(abandoned = abandoned.len(), "subject delivery pass aborted by a panic");
    drop(abandoned);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{
    prelude::*,
    subject::recorder::{Event, Recorder},
  };

  #[rxsubject_macro::test]
  fn reentrant_emission_keeps_order_for_every_observer() {
    let subject = Local::publish_subject::<i32, ()>();
    let c_subject = subject.clone();
    subject.subscribe(move |v| {
      if v == 1 {
        c_subject.next(2);
      }
    });
    let rec = Recorder::new();
    subject.subscribe_with(rec.clone());

    subject.next(1);
    assert_eq!(rec.values(), [1, 2]);
  }

  #[rxsubject_macro::test]
  fn reentrant_subscribe_misses_the_value_in_flight() {
    let subject = Local::publish_subject::<i32, ()>();
    let late = Recorder::new();
    let (c_subject, c_late) = (subject.clone(), late.clone());
    let once = Rc::new(RefCell::new(true));
    subject.subscribe(move |_| {
      if once.replace(false) {
        c_subject.subscribe_with(c_late.clone());
      }
    });

    subject.next(1);
    assert_eq!(subject.subscriber_count(), 2);
    subject.next(2);
    assert_eq!(late.values(), [2]);
  }

  #[rxsubject_macro::test]
  fn reentrant_subscribe_to_behavior_sees_latest_once() {
    let subject = Local::behavior_subject::<i32, ()>(0);
    let late = Recorder::new();
    let (c_subject, c_late) = (subject.clone(), late.clone());
    subject.subscribe(move |v| {
      if v == 1 {
        c_subject.subscribe_with(c_late.clone());
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(late.values(), [1, 2]);
  }

  #[rxsubject_macro::test]
  fn unsubscribe_in_callback_applies_to_the_same_pass() {
    let subject = Local::publish_subject::<i32, ()>();
    let victim = Recorder::new();
    let handle = Rc::new(RefCell::new(None));

    let c_handle = handle.clone();
    subject.subscribe(move |_| {
      let cancel = c_handle.borrow_mut().take();
      if let Some(s) = cancel {
        Subscription::unsubscribe(s);
      }
    });
    let subscription = subject.subscribe_with(victim.clone());
    *handle.borrow_mut() = Some(subscription.clone());

    subject.next(1);
    assert!(victim.events().is_empty());
    assert!(subscription.is_closed());
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[rxsubject_macro::test]
  fn cancelled_pending_subscribe_never_attaches() {
    let subject = Local::replay_subject::<i32, ()>();
    subject.next(1);
    let ghost = Recorder::new();
    let (c_subject, c_ghost) = (subject.clone(), ghost.clone());
    let trigger = subject.subscribe(move |v| {
      if v == 2 {
        let subscription = c_subject.subscribe_with(c_ghost.clone());
        assert!(!subscription.is_closed());
        subscription.unsubscribe();
      }
    });

    subject.next(2);
    subject.next(3);
    assert!(ghost.events().is_empty());
    assert_eq!(subject.subscriber_count(), 1);
    trigger.unsubscribe();
  }

  #[rxsubject_macro::test]
  fn reentrant_complete_runs_after_the_pass() {
    let subject = Local::publish_subject::<i32, ()>();
    let c_subject = subject.clone();
    subject.subscribe(move |_| c_subject.complete());
    let rec = Recorder::new();
    subject.subscribe_with(rec.clone());

    subject.next(1);
    assert_eq!(rec.events(), [Event::Next(1), Event::Complete]);
    assert!(subject.is_closed());
  }

  #[rxsubject_macro::test]
  fn fan_out_order_survives_interleaved_unsubscribes() {
    let subject = Local::publish_subject::<usize, ()>();
    let order = Rc::new(RefCell::new(vec![]));
    let subscriptions: Vec<_> = (0..1000)
      .map(|tag| {
        let order = order.clone();
        subject.subscribe(move |_| order.borrow_mut().push(tag))
      })
      .collect();
    for (tag, subscription) in subscriptions.into_iter().enumerate() {
      if tag % 3 != 0 {
        subscription.unsubscribe();
      }
    }
    subject.subscribe({
      let order = order.clone();
      move |_| order.borrow_mut().push(1000)
    });

    subject.next(0);
    let expected: Vec<_> = (0..1000).step_by(3).chain([1000]).collect();
    assert_eq!(*order.borrow(), expected);
    assert_eq!(subject.subscriber_count(), expected.len());
  }

  #[rxsubject_macro::test]
  fn closed_observer_is_dropped() {
    struct TakeTwo(Rc<RefCell<Vec<i32>>>);

    impl Observer<i32, ()> for TakeTwo {
      fn next(&mut self, value: i32) { self.0.borrow_mut().push(value); }

      fn error(self, _: ()) {}

      fn complete(self) {}

      fn is_closed(&self) -> bool { self.0.borrow().len() >= 2 }
    }

    let subject = Local::publish_subject::<i32, ()>();
    let seen = Rc::new(RefCell::new(vec![]));
    let subscription = subject.subscribe_with(TakeTwo(seen.clone()));
    for v in 1..=4 {
      subject.next(v);
    }
    assert_eq!(*seen.borrow(), [1, 2]);
    assert!(subscription.is_closed());
    assert!(subject.is_empty());
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsubject_macro::test]
  fn panicking_observer_leaves_subject_usable() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let subject = Local::publish_subject::<i32, ()>();
    let rec = Recorder::new();
    subject.subscribe(|v| {
      if v == 1 {
        panic!("observer failure");
      }
    });
    subject.subscribe_with(rec.clone());

    assert!(catch_unwind(AssertUnwindSafe(|| subject.next(1))).is_err());
    // the panicking observer was lent out and is gone, the other one stays
    assert_eq!(subject.subscriber_count(), 1);
    subject.next(2);
    subject.complete();
    assert_eq!(rec.events(), [Event::Next(2), Event::Complete]);
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsubject_macro::test]
  fn unsubscribe_waits_for_in_flight_delivery() {
    use std::{
      sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
      },
      thread,
      time::Duration,
    };

    let subject = Shared::publish_subject::<i32, ()>();
    let (tx, rx) = mpsc::channel();
    let finished = Arc::new(AtomicBool::new(false));
    let c_finished = finished.clone();
    let subscription = subject.subscribe(move |_| {
      tx.send(()).unwrap();
      thread::sleep(Duration::from_millis(50));
      c_finished.store(true, Ordering::SeqCst);
    });

    let producer = {
      let subject = subject.clone();
      thread::spawn(move || subject.next(1))
    };
    rx.recv().unwrap();
    subscription.unsubscribe();
    assert!(finished.load(Ordering::SeqCst));
    producer.join().unwrap();

    subject.next(2);
    assert!(rx.try_recv().is_err());
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsubject_macro::test]
  fn concurrent_producers_deliver_each_value_once() {
    use std::sync::{Arc, Mutex};

    let subject = Shared::replay_subject::<usize, ()>();
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    subject.subscribe(move |v| c_seen.lock().unwrap().push(v));

    let producers: Vec<_> = (0..4)
      .map(|t| {
        let subject = subject.clone();
        std::thread::spawn(move || {
          for i in 0..100 {
            subject.next(t * 100 + i);
          }
        })
      })
      .collect();
    for p in producers {
      p.join().unwrap();
    }
    subject.complete();

    let mut seen = seen.lock().unwrap().clone();
    assert_eq!(seen, subject.buffered());
    seen.sort_unstable();
    assert_eq!(seen, (0..400).collect::<Vec<_>>());
  }
}
