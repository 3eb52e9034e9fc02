//! Unit tests for the shared context store

use std::sync::{Arc, Mutex};

use serde_json::json;
use swidget_domain::constants::MAX_CONTEXT_NOTIFY_ROUNDS;
use swidget_domain::context::{ContextFields, SharedContext};
use swidget_domain::error::Error;

fn defaults() -> ContextFields {
    let mut fields = ContextFields::new();
    fields.insert("test".to_string(), json!("Default Context Value"));
    fields
}

#[test]
fn test_default_snapshot() {
    let context = SharedContext::create(defaults());

    let snapshot = context.get();

    assert_eq!(snapshot.version(), 0);
    assert_eq!(snapshot.get_str("test"), Some("Default Context Value"));
}

#[test]
fn test_from_non_object_is_empty() {
    let context = SharedContext::from_value(json!(["not", "an", "object"]));

    assert!(context.get().fields().is_empty());
}

#[test]
fn test_update_is_visible_to_every_handle() {
    let context = SharedContext::create(defaults());
    let first = context.handle();
    let second = context.handle();

    first.set("test", "Context from swidget 1").unwrap();

    assert_eq!(second.get().get_str("test"), Some("Context from swidget 1"));
    assert_eq!(second.version(), 1);
    assert!(first.same_context(&second));
}

#[test]
fn test_subscribers_run_before_update_returns() {
    let context = SharedContext::create(defaults());
    let handle = context.handle();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = handle.subscribe(move |snapshot| {
        sink.lock()
            .unwrap()
            .push(snapshot.get_str("test").unwrap_or_default().to_string());
    });

    handle.set("test", "updated").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["updated".to_string()]);
}

#[test]
fn test_noop_update_does_not_notify() {
    let context = SharedContext::create(defaults());
    let handle = context.handle();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = handle.subscribe(move |_| *counter.lock().unwrap() += 1);

    handle.set("test", "Default Context Value").unwrap();

    assert_eq!(handle.version(), 0);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_update_returns_closure_result() {
    let context = SharedContext::create(defaults());

    let previous = context
        .update(|fields| fields.insert("test".to_string(), json!("next")))
        .unwrap();

    assert_eq!(previous, Some(json!("Default Context Value")));
}

#[test]
fn test_conditional_update_detects_stale_version() {
    let context = SharedContext::create(defaults());
    let handle = context.handle();
    let seen = handle.version();
    handle.set("test", "first writer").unwrap();

    let err = handle
        .update_if(seen, |fields| {
            fields.insert("test".to_string(), json!("second writer"));
        })
        .unwrap_err();

    assert!(matches!(
        err,
        Error::StaleContext {
            expected: 0,
            actual: 1
        }
    ));
    assert_eq!(handle.get().get_str("test"), Some("first writer"));
    handle
        .update_if(1, |fields| {
            fields.insert("test".to_string(), json!("second writer"));
        })
        .unwrap();
}

#[test]
fn test_dropped_subscription_stops_notifications() {
    let context = SharedContext::create(defaults());
    let handle = context.handle();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let subscription = handle.subscribe(move |_| *counter.lock().unwrap() += 1);
    assert_eq!(handle.subscriber_count(), 1);

    handle.set("test", "a").unwrap();
    drop(subscription);
    handle.set("test", "b").unwrap();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(handle.subscriber_count(), 0);
}

#[test]
fn test_closed_context_rejects_updates() {
    let context = SharedContext::create(defaults());
    let handle = context.handle();
    let _subscription = handle.subscribe(|_| {});

    context.close();

    assert!(handle.is_closed());
    assert_eq!(handle.subscriber_count(), 0);
    assert!(matches!(handle.set("test", "late"), Err(Error::ContextClosed)));
    // Reads still see the last snapshot
    assert_eq!(handle.get().get_str("test"), Some("Default Context Value"));
}

#[test]
fn test_dropping_owner_closes_context() {
    let handle = SharedContext::create(defaults()).handle();

    assert!(handle.is_closed());
}

#[test]
fn test_reentrant_updates_are_coalesced() {
    let context = SharedContext::create(ContextFields::new());
    let handle = context.handle();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let writer = handle.clone();
    let _subscription = handle.subscribe(move |snapshot| {
        let count = snapshot.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
        sink.lock().unwrap().push(count);
        if count < 3 {
            writer.set("count", count + 1).unwrap();
        }
    });

    handle.set("count", 1).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(handle.version(), 3);
}

#[test]
fn test_runaway_subscriber_is_bounded() {
    let context = SharedContext::create(ContextFields::new());
    let handle = context.handle();
    let calls = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&calls);
    let writer = handle.clone();
    let _subscription = handle.subscribe(move |snapshot| {
        *counter.lock().unwrap() += 1;
        writer.set("tick", snapshot.version() + 1).unwrap();
    });

    handle.set("tick", 0).unwrap();

    assert_eq!(*calls.lock().unwrap(), MAX_CONTEXT_NOTIFY_ROUNDS);
    assert_eq!(handle.version() as usize, MAX_CONTEXT_NOTIFY_ROUNDS + 1);
}
