//! Subjects: multicast points that a producer feeds and observers subscribe
//! to.
//!
//! | Subject | A late subscriber first receives |
//! |---------|----------------------------------|
//! | [`LocalPublishSubject`] | nothing |
//! | [`LocalBehaviorSubject`] | the latest value (or the seed) |
//! | [`LocalReplaySubject`] | every value emitted so far |
//! | [`LocalAsyncSubject`] | the last value, and only after completion |
//!
//! Each has a `Shared*` twin that is `Send + Sync`.

mod async_subject;
mod behavior_subject;
pub mod policy;
mod publish_subject;
mod replay_subject;
mod subject_core;
mod subject_subscription;
mod subscribers;

pub use async_subject::*;
pub use behavior_subject::*;
pub use policy::{AsyncLast, Behavior, Policy, Publish, Replay};
pub use publish_subject::*;
pub use replay_subject::*;
pub use subject_core::{LocalCore, SharedCore, Subject, SubjectCore, SubjectObserver, TerminalState};
pub use subject_subscription::SubjectSubscription;
