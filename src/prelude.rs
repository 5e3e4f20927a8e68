//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Factories
pub use crate::factory::{Local, Shared};
// Observer trait and closure observers
pub use crate::observer::{
  BoxedObserver, BoxedObserverSend, DynObserver, IntoBoxedObserver, Noop, Observer, ObserverFn,
};
// Shared pointer types
pub use crate::rc::{MutArc, MutRc, RcDeref};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
