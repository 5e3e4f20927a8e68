use smallvec::SmallVec;

/// Ordered, id-keyed list of the observers attached to a subject.
///
/// Each entry is a slot that is either occupied or *vacant*. A slot is vacant
/// while its observer is lent out to a callback (or is still receiving its
/// subscribe-time replay), so that the subject's state is never borrowed while
/// user code runs. Removing a vacant slot is how a cancellation that lands in
/// the middle of a delivery is recorded: the observer is dropped instead of
/// restored.
///
/// # Design
///
/// - **SmallVec Optimization**: the common case of one or two subscribers
///   needs no heap allocation.
/// - **Monotonic IDs**: ids are never reused, so a stale subscription can
///   never remove somebody else's observer.
/// - **Sorted slots**: ids are reserved in subscription order and slots are
///   only ever appended, so the slots stay sorted by id and lookups are a
///   binary search.
pub struct Subscribers<O> {
  next_id: usize,
  slots: SmallVec<[(usize, Option<O>); 2]>,
}

impl<O> Default for Subscribers<O> {
  fn default() -> Self { Self { next_id: 0, slots: SmallVec::new() } }
}

impl<O> Subscribers<O> {
  /// Reserve the next id without adding a slot.
  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Append a vacant slot for a pre-reserved id.
  #[inline]
  pub fn insert_vacant(&mut self, id: usize) { self.slots.push((id, None)); }

  /// Append an observer and return its id.
  #[cfg(test)]
  pub fn add(&mut self, observer: O) -> usize {
    let id = self.reserve_id();
    self.slots.push((id, Some(observer)));
    id
  }

  /// Remove a slot. The outer `Option` tells whether the id was present, the
  /// inner one whether the slot was occupied.
  pub fn remove(&mut self, id: usize) -> Option<Option<O>> {
    self.position(id).map(|pos| self.slots.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.position(id).is_some() }

  /// Take the observer out of its slot, leaving the slot vacant.
  pub fn lend(&mut self, id: usize) -> Option<O> {
    let pos = self.position(id)?;
    self.slots[pos].1.take()
  }

  /// Put a lent observer back.
  ///
  /// Returns the observer when it must not be kept: its slot was removed in
  /// the meantime, or `closed` is set (then the slot is removed too). The
  /// caller drops the returned observer once it no longer borrows `self`.
  pub fn restore(&mut self, id: usize, observer: O, closed: bool) -> Option<O> {
    let Some(pos) = self.position(id) else {
      return Some(observer);
    };
    if closed {
      self.slots.remove(pos);
      return Some(observer);
    }
    self.slots[pos].1 = Some(observer);
    None
  }

  /// Snapshot of the ids in subscription order.
  pub fn ids(&self) -> SmallVec<[usize; 4]> { self.slots.iter().map(|(id, _)| *id).collect() }

  /// Remove every slot and hand back the occupied ones, in order.
  pub fn drain(&mut self) -> SmallVec<[O; 2]> {
    self
      .slots
      .drain(..)
      .filter_map(|(_, slot)| slot)
      .collect()
  }

  /// Drop the vacant slots left behind by an aborted delivery.
  pub fn prune_vacant(&mut self) { self.slots.retain(|(_, slot)| slot.is_some()); }

  /// Number of attached observers, including ones currently lent out.
  #[inline]
  pub fn len(&self) -> usize { self.slots.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.slots.is_empty() }

  #[inline]
  fn position(&self, id: usize) -> Option<usize> {
    self.slots.binary_search_by_key(&id, |(i, _)| *i).ok()
  }
}
