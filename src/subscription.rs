//! Subscription handles returned by `subscribe`.

/// Handle that detaches one observer from its source.
pub trait Subscription {
  /// Stops delivery to the observer behind this handle. Cancelling a handle
  /// that is already closed does nothing.
  fn unsubscribe(self);

  /// Returns `true` once no further callback can reach the observer, either
  /// because it was cancelled or because it received a terminal signal.
  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** if the guard is not bound to a variable it is dropped,
  /// and the subscription cancelled, immediately.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }
}

/// Scoped subscription: unsubscribes when dropped.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> Self { SubscriptionGuard(Some(subscription)) }

  /// Gives the subscription back without cancelling it.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }

  pub fn is_closed(&self) -> bool { self.0.as_ref().is_none_or(Subscription::is_closed) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}
