//! Integration tests for the subject family.
//!
//! Exercised through the public prelude only, mixing local and shared
//! subjects.

use std::sync::{Arc, Mutex};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

use rxsubject::prelude::*;

#[derive(Clone, Debug, PartialEq)]
enum Ev {
  Next(i32),
  Err(String),
  Done,
}

type Log = Arc<Mutex<Vec<Ev>>>;

fn log() -> Log { Arc::new(Mutex::new(vec![])) }

fn snapshot(log: &Log) -> Vec<Ev> { log.lock().unwrap().clone() }

/// An observer writing into `log`; `Send`, so it fits both scopes.
fn logger(log: &Log) -> impl Observer<i32, String> + Send + Clone + 'static {
  let (n, e, c) = (log.clone(), log.clone(), log.clone());
  ObserverFn::new()
    .on_next(move |v: i32| n.lock().unwrap().push(Ev::Next(v)))
    .on_error(move |err: String| e.lock().unwrap().push(Ev::Err(err)))
    .on_complete(move || c.lock().unwrap().push(Ev::Done))
}

#[rxsubject_macro::test]
fn single_terminal_delivery() {
  let publish = log();
  let subject = Local::publish_subject::<i32, String>();
  subject.subscribe_with(logger(&publish));
  subject.next(1);
  subject.error("first".into());
  subject.error("second".into());
  subject.complete();
  subject.next(2);
  assert_eq!(snapshot(&publish), [Ev::Next(1), Ev::Err("first".into())]);

  let shared = log();
  let subject = Shared::publish_subject::<i32, String>();
  subject.subscribe_with(logger(&shared));
  subject.complete();
  subject.error("late".into());
  subject.complete();
  assert_eq!(snapshot(&shared), [Ev::Done]);
}

#[rxsubject_macro::test]
fn ordering_across_observers() {
  let order = Arc::new(Mutex::new(vec![]));
  let subject = Shared::publish_subject::<i32, String>();
  for tag in 0..3 {
    let order = order.clone();
    subject.subscribe(move |v| order.lock().unwrap().push((tag, v)));
  }
  subject.next(10);
  subject.next(20);
  assert_eq!(
    *order.lock().unwrap(),
    [(0, 10), (1, 10), (2, 10), (0, 20), (1, 20), (2, 20)]
  );
}

#[rxsubject_macro::test]
fn publish_isolation() {
  let (a, b) = (log(), log());
  let subject = Local::publish_subject::<i32, String>();
  subject.subscribe_with(logger(&a));
  subject.next(1);
  subject.subscribe_with(logger(&b));
  subject.next(2);
  assert_eq!(snapshot(&a), [Ev::Next(1), Ev::Next(2)]);
  assert_eq!(snapshot(&b), [Ev::Next(2)]);
}

#[rxsubject_macro::test]
fn behavior_replays_one() {
  let late = log();
  let subject = Shared::behavior_subject::<i32, String>(0);
  subject.next(1);
  subject.next(2);
  subject.subscribe_with(logger(&late));
  subject.next(3);
  assert_eq!(snapshot(&late), [Ev::Next(2), Ev::Next(3)]);
  assert_eq!(subject.value(), 3);

  let seed_only = log();
  let subject = Local::behavior_subject::<i32, String>(7);
  subject.subscribe_with(logger(&seed_only));
  subject.complete();
  assert_eq!(snapshot(&seed_only), [Ev::Next(7), Ev::Done]);
}

#[rxsubject_macro::test]
fn replay_replays_all() {
  let (early, late) = (log(), log());
  let subject = Local::replay_subject::<i32, String>();
  subject.subscribe_with(logger(&early));
  subject.next(1);
  subject.next(2);
  subject.error("boom".into());
  subject.subscribe_with(logger(&late));

  let expected = [Ev::Next(1), Ev::Next(2), Ev::Err("boom".into())];
  assert_eq!(snapshot(&early), expected);
  assert_eq!(snapshot(&late), expected);
}

#[rxsubject_macro::test]
fn async_last_only() {
  let (early, late) = (log(), log());
  let subject = Shared::async_subject::<i32, String>();
  subject.subscribe_with(logger(&early));
  for v in 1..=3 {
    subject.next(v);
  }
  assert!(snapshot(&early).is_empty());
  subject.complete();
  subject.subscribe_with(logger(&late));

  assert_eq!(snapshot(&early), [Ev::Next(3), Ev::Done]);
  assert_eq!(snapshot(&late), [Ev::Next(3), Ev::Done]);
}

#[rxsubject_macro::test]
fn error_suppresses_async_buffer() {
  let (early, late) = (log(), log());
  let subject = Local::async_subject::<i32, String>();
  subject.subscribe_with(logger(&early));
  subject.next(1);
  subject.error("boom".into());
  subject.subscribe_with(logger(&late));

  assert_eq!(snapshot(&early), [Ev::Err("boom".into())]);
  assert_eq!(snapshot(&late), [Ev::Err("boom".into())]);
}

#[rxsubject_macro::test]
fn cancellation_is_idempotent() {
  let seen = log();
  let subject = Local::replay_subject::<i32, String>();
  let keep = log();
  subject.subscribe_with(logger(&keep));
  let subscription = subject.subscribe_with(logger(&seen));
  let twin = subscription.clone();

  subject.next(1);
  subscription.unsubscribe();
  twin.clone().unsubscribe();
  assert!(twin.is_closed());
  subject.next(2);
  subject.complete();

  assert_eq!(snapshot(&seen), [Ev::Next(1)]);
  assert_eq!(snapshot(&keep), [Ev::Next(1), Ev::Next(2), Ev::Done]);
}

#[rxsubject_macro::test]
fn subject_forwards_into_subject() {
  let out = log();
  let source = Local::publish_subject::<i32, String>();
  let sink = Local::replay_subject::<i32, String>();
  source.subscribe_with(sink.observer());

  source.next(1);
  source.next(2);
  source.error("stop".into());
  sink.subscribe_with(logger(&out));

  assert_eq!(snapshot(&out), [Ev::Next(1), Ev::Next(2), Ev::Err("stop".into())]);
}

#[rxsubject_macro::test]
fn guard_cancels_on_scope_exit() {
  let seen = log();
  let subject = Shared::publish_subject::<i32, String>();
  {
    let guard = subject.subscribe_with(logger(&seen)).unsubscribe_when_dropped();
    subject.next(1);
    assert!(!guard.is_closed());
  }
  subject.next(2);
  assert_eq!(snapshot(&seen), [Ev::Next(1)]);
  assert_eq!(subject.subscriber_count(), 0);
}

#[cfg(not(target_arch = "wasm32"))]
#[rxsubject_macro::test]
fn terminal_delivered_once_under_contention() {
  let seen = log();
  let subject = Shared::behavior_subject::<i32, String>(0);
  subject.subscribe_with(logger(&seen));

  let racers: Vec<_> = (0..8)
    .map(|i| {
      let subject = subject.clone();
      thread::spawn(move || {
        if i % 2 == 0 {
          subject.complete();
        } else {
          subject.error(format!("racer {i}"));
        }
      })
    })
    .collect();
  for r in racers {
    r.join().unwrap();
  }

  let events = snapshot(&seen);
  assert_eq!(events[0], Ev::Next(0));
  let terminals = events[1..].iter().filter(|e| !matches!(e, Ev::Next(_))).count();
  assert_eq!(terminals, 1);
  assert!(subject.is_closed());
}

#[cfg(not(target_arch = "wasm32"))]
#[rxsubject_macro::test(shared)]
async fn subscribe_from_spawned_tasks() {
  let subject = Shared::replay_subject::<i32, String>();
  subject.next(1);
  subject.next(2);

  let tasks: Vec<_> = (0..4)
    .map(|_| {
      let subject = subject.clone();
      tokio::spawn(async move {
        let seen = log();
        subject.subscribe_with(logger(&seen));
        seen
      })
    })
    .collect();

  let mut logs = vec![];
  for t in tasks {
    logs.push(t.await.unwrap());
  }
  subject.complete();

  for l in &logs {
    assert_eq!(snapshot(l), [Ev::Next(1), Ev::Next(2), Ev::Done]);
  }
}

#[cfg(not(target_arch = "wasm32"))]
#[rxsubject_macro::test(local)]
async fn local_subject_in_async_context() {
  let seen = log();
  let subject = Local::async_subject::<i32, String>();
  subject.subscribe_with(logger(&seen));
  subject.next(42);
  tokio::task::yield_now().await;
  subject.complete();
  assert_eq!(snapshot(&seen), [Ev::Next(42), Ev::Done]);
}
