//! Buffering policies that tell a subject what to remember and what to
//! replay to an observer joining late.

use std::collections::VecDeque;

use smallvec::SmallVec;

use super::subject_core::TerminalState;

/// Values handed to a subscriber before it joins the live emissions.
pub type Replayed<Item> = SmallVec<[Item; 1]>;

/// Decides what a subject retains from its emissions.
///
/// The subject calls these hooks while it holds its own state, before any
/// observer callback runs.
pub trait Policy<Item> {
  /// Record an emitted value. Returns the value if it should be delivered to
  /// the active observers right away.
  fn record(&mut self, value: Item) -> Option<Item>;

  /// Values to deliver to an observer subscribing while the subject is in
  /// `state`.
  fn replay<Err>(&self, state: &TerminalState<Err>) -> Replayed<Item>;

  /// Value delivered to every active observer right before completion.
  fn flush(&mut self) -> Option<Item> { None }

  /// Called when the subject terminates with an error.
  fn discard(&mut self) {}
}

/// No buffer: observers see only what is emitted after they subscribe.
#[derive(Clone, Copy, Debug, Default)]
pub struct Publish;

impl<Item> Policy<Item> for Publish {
  #[inline]
  fn record(&mut self, value: Item) -> Option<Item> { Some(value) }

  #[inline]
  fn replay<Err>(&self, _: &TerminalState<Err>) -> Replayed<Item> { Replayed::new() }
}

/// Latest value, seeded at construction.
///
/// Not replayed once the subject has terminated.
#[derive(Clone, Debug)]
pub struct Behavior<Item> {
  pub(crate) value: Item,
}

impl<Item> Behavior<Item> {
  pub fn new(seed: Item) -> Self { Self { value: seed } }
}

impl<Item: Clone> Policy<Item> for Behavior<Item> {
  fn record(&mut self, value: Item) -> Option<Item> {
    self.value = value.clone();
    Some(value)
  }

  fn replay<Err>(&self, state: &TerminalState<Err>) -> Replayed<Item> {
    let mut replayed = Replayed::new();
    if state.is_active() {
      replayed.push(self.value.clone());
    }
    replayed
  }
}

/// Ordered history of every value, optionally capped to the latest
/// `capacity` values.
#[derive(Clone, Debug, Default)]
pub struct Replay<Item> {
  pub(crate) buffer: VecDeque<Item>,
  capacity: Option<usize>,
}

impl<Item> Replay<Item> {
  /// Unbounded history.
  pub fn new() -> Self { Self { buffer: VecDeque::new(), capacity: None } }

  /// History of at most `capacity` values; older ones are evicted first.
  pub fn with_capacity(capacity: usize) -> Self {
    Self { buffer: VecDeque::with_capacity(capacity), capacity: Some(capacity) }
  }
}

impl<Item: Clone> Policy<Item> for Replay<Item> {
  fn record(&mut self, value: Item) -> Option<Item> {
    if self.capacity != Some(0) {
      if Some(self.buffer.len()) == self.capacity {
        self.buffer.pop_front();
      }
      self.buffer.push_back(value.clone());
    }
    Some(value)
  }

  fn replay<Err>(&self, _: &TerminalState<Err>) -> Replayed<Item> {
    self.buffer.iter().cloned().collect()
  }
}

/// Last value only, released when the subject completes.
#[derive(Clone, Debug)]
pub struct AsyncLast<Item> {
  pub(crate) last: Option<Item>,
}

impl<Item> Default for AsyncLast<Item> {
  fn default() -> Self { Self { last: None } }
}

impl<Item: Clone> Policy<Item> for AsyncLast<Item> {
  fn record(&mut self, value: Item) -> Option<Item> {
    self.last = Some(value);
    None
  }

  fn replay<Err>(&self, state: &TerminalState<Err>) -> Replayed<Item> {
    match state {
      TerminalState::Completed => self.last.iter().cloned().collect(),
      _ => Replayed::new(),
    }
  }

  fn flush(&mut self) -> Option<Item> { self.last.clone() }

  fn discard(&mut self) { self.last = None; }
}
