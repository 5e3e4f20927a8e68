//! # rxsubject: multicast subjects for Rust
//!
//! A subject is a hot, multicast point: a producer pushes values into it and
//! every attached observer receives them, synchronously and in subscription
//! order, until the subject completes or errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxsubject::prelude::*;
//!
//! let subject = Local::replay_subject::<i32, String>();
//! subject.next(1);
//! subject.next(2);
//!
//! // A late subscriber is replayed the history first.
//! let subscription = subject.subscribe(|v| println!("Value: {v}"));
//! subject.next(3);
//! subscription.unsubscribe();
//! subject.complete();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Local`] / [`Shared`] | Subject factories (single-thread vs thread-safe) |
//! | [`Subject`] | The multicast point, parameterized by scope and buffering policy |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! ## Feature Flags
//!
//! - **`tracing`**: emit `tracing` events for subscribe, unsubscribe,
//!   termination and aborted delivery passes.
//!
//! [`Local`]: prelude::Local
//! [`Shared`]: prelude::Shared
//! [`Subject`]: subject::Subject
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription

mod log;

pub mod factory;
pub mod observer;
pub mod prelude;
pub mod rc;
pub mod subject;
pub mod subscription;
