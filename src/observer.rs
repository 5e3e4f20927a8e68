//! Observer trait and implementations
//!
//! The Observer trait defines the consumer side of a subject. It provides
//! three methods: next (for values), error (for the terminal error), and
//! complete (for normal termination).

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the consumer of a subject's emissions.
///
/// The terminal methods take `self` by value, so an observer can receive at
/// most one of them and nothing after it.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the terminal error. Consumes the observer.
  fn error(self, err: Err);

  /// Receive the completion signal. Consumes the observer.
  fn complete(self);

  /// Returns `true` once the observer will not accept more values.
  ///
  /// A subject drops an observer that reports itself closed after a delivery.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], so subjects can store
/// `Box<dyn DynObserver<..>>` regardless of the concrete observer type.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

macro_rules! impl_observer_for_box {
  ($ty:ty) => {
    impl<'a, Item, Err> Observer<Item, Err> for $ty {
      #[inline]
      fn next(&mut self, value: Item) { (**self).box_next(value) }

      #[inline]
      fn error(self, err: Err) { self.box_error(err) }

      #[inline]
      fn complete(self) { self.box_complete() }

      #[inline]
      fn is_closed(&self) -> bool { (**self).box_is_closed() }
    }
  };
}

impl_observer_for_box!(Box<dyn DynObserver<Item, Err> + 'a>);
impl_observer_for_box!(Box<dyn DynObserver<Item, Err> + Send + 'a>);

/// Boxed observer for single-threaded subjects.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

/// Boxed observer for thread-safe subjects.
pub type BoxedObserverSend<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

// ============================================================================
// IntoBoxedObserver Trait
// ============================================================================

/// Converts a concrete observer into the boxed form a subject stores.
///
/// Local subjects store [`BoxedObserver`], shared subjects
/// [`BoxedObserverSend`]; the blanket impls pick the right one and demand
/// `Send` only for the latter.
pub trait IntoBoxedObserver<O> {
  fn into_boxed(self) -> O;
}

impl<'a, Item, Err, O> IntoBoxedObserver<BoxedObserver<'a, Item, Err>> for O
where
  O: Observer<Item, Err> + 'a,
{
  fn into_boxed(self) -> BoxedObserver<'a, Item, Err> { Box::new(self) }
}

impl<'a, Item, Err, O> IntoBoxedObserver<BoxedObserverSend<'a, Item, Err>> for O
where
  O: Observer<Item, Err> + Send + 'a,
{
  fn into_boxed(self) -> BoxedObserverSend<'a, Item, Err> { Box::new(self) }
}

// ============================================================================
// ObserverFn - three optional callback slots
// ============================================================================

/// Placeholder for a callback slot that was not provided.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

/// A `next` slot: either [`Noop`] or any `FnMut(Item)`.
pub trait NextFn<Item> {
  fn call_next(&mut self, value: Item);
}

/// An `error` slot: either [`Noop`] or any `FnOnce(Err)`.
pub trait ErrorFn<Err> {
  fn call_error(self, err: Err);
}

/// A `complete` slot: either [`Noop`] or any `FnOnce()`.
pub trait CompleteFn {
  fn call_complete(self);
}

impl<Item> NextFn<Item> for Noop {
  #[inline]
  fn call_next(&mut self, _: Item) {}
}

impl<Item, F: FnMut(Item)> NextFn<Item> for F {
  #[inline]
  fn call_next(&mut self, value: Item) { self(value) }
}

impl<Err> ErrorFn<Err> for Noop {
  #[inline]
  fn call_error(self, _: Err) {}
}

impl<Err, F: FnOnce(Err)> ErrorFn<Err> for F {
  #[inline]
  fn call_error(self, err: Err) { self(err) }
}

impl CompleteFn for Noop {
  #[inline]
  fn call_complete(self) {}
}

impl<F: FnOnce()> CompleteFn for F {
  #[inline]
  fn call_complete(self) { self() }
}

/// Observer assembled from up to three callbacks; a missing one is a no-op.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let log = Rc::new(RefCell::new(vec![]));
/// let subject = Local::publish_subject::<i32, String>();
///
/// let (l1, l2) = (log.clone(), log.clone());
/// subject.subscribe_with(
///   ObserverFn::new()
///     .on_next(move |v: i32| l1.borrow_mut().push(format!("next {v}")))
///     .on_error(move |e: String| l2.borrow_mut().push(format!("error {e}"))),
/// );
///
/// subject.next(1);
/// subject.error("boom".to_string());
/// assert_eq!(*log.borrow(), ["next 1", "error boom"]);
/// ```
#[derive(Clone, Default)]
pub struct ObserverFn<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl ObserverFn<Noop, Noop, Noop> {
  /// An observer that ignores every event.
  pub fn new() -> Self { Self { next: Noop, error: Noop, complete: Noop } }
}

impl<N, E, C> ObserverFn<N, E, C> {
  pub fn on_next<N2>(self, next: N2) -> ObserverFn<N2, E, C> {
    ObserverFn { next, error: self.error, complete: self.complete }
  }

  pub fn on_error<E2>(self, error: E2) -> ObserverFn<N, E2, C> {
    ObserverFn { next: self.next, error, complete: self.complete }
  }

  pub fn on_complete<C2>(self, complete: C2) -> ObserverFn<N, E, C2> {
    ObserverFn { next: self.next, error: self.error, complete }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverFn<N, E, C>
where
  N: NextFn<Item>,
  E: ErrorFn<Err>,
  C: CompleteFn,
{
  #[inline]
  fn next(&mut self, value: Item) { self.next.call_next(value) }

  #[inline]
  fn error(self, err: Err) { self.error.call_error(err) }

  #[inline]
  fn complete(self) { self.complete.call_complete() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Tests
// ============================================================================
