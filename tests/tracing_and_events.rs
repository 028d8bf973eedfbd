//! Integration tests for tracing callbacks and registry events.
//!
//! Every registry interaction emits a `RegistryEvent` to the instance's
//! trace callback, if one is set. These tests capture the events and check
//! both their order and their rendered form.

use resource_registry::{Registry, RegistryEvent, ResourceKind};
use std::sync::{Arc, Mutex};

/// Installs a callback that records rendered events into a shared vec.
fn capture_events(registry: &Registry) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    registry.set_trace_callback(move |event| {
        sink.lock().unwrap().push(format!("{}", event));
    });
    events
}

#[test]
fn test_register_and_resolve_events() {
    let registry = Registry::new();
    let events = capture_events(&registry);

    registry.register_item("config", 1u8).unwrap();
    registry.register_factory("session", |_| 2u8).unwrap();
    let _ = registry.resolve::<u8>("config");
    let _ = registry.resolve::<u8>("missing");

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "register { name: config, kind: item }",
            "register { name: session, kind: factory }",
            "resolve { name: config, found: true }",
            "resolve { name: missing, found: false }",
        ]
    );
}

#[test]
fn test_contains_and_factory_events() {
    let registry = Registry::new();
    let events = capture_events(&registry);

    let _ = registry.contains("db");
    registry.register_factory("db", |_| 0i64).unwrap();
    let _ = registry.contains("db");
    let _ = registry.factory("db");
    let _ = registry.factory("config");

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "contains { name: db, found: false }",
            "register { name: db, kind: factory }",
            "contains { name: db, found: true }",
            "factory { name: db, found: true }",
            "factory { name: config, found: false }",
        ]
    );
}

#[test]
fn test_lock_and_clear_events() {
    let registry = Registry::new();
    let events = capture_events(&registry);

    registry.lock();
    registry.unlock();
    registry.clear().unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "lock { locked: true }",
            "lock { locked: false }",
            "Clearing the Registry",
        ]
    );
}

#[test]
fn test_failed_registration_emits_no_event() {
    let registry = Registry::new();
    registry.lock();

    let events = capture_events(&registry);
    let _ = registry.register_item("blocked", 1i32);

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_clearing_callback_stops_events() {
    let registry = Registry::new();
    let events = capture_events(&registry);

    registry.register_item("first", 1i32).unwrap();
    assert_eq!(events.lock().unwrap().len(), 1);

    registry.clear_trace_callback();

    registry.register_item("second", 2i32).unwrap();
    let _ = registry.resolve::<i32>("second");
    assert_eq!(events.lock().unwrap().len(), 1); // still only the first event
}

#[test]
fn test_structured_events_carry_fields() {
    let registry = Registry::new();
    let events: Arc<Mutex<Vec<RegistryEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    registry.set_trace_callback(move |event| {
        sink.lock().unwrap().push(event.clone());
    });

    registry.register_factory("db", |_| 1i32).unwrap();

    let captured = events.lock().unwrap();
    match &captured[0] {
        RegistryEvent::Register { name, kind } => {
            assert_eq!(name, "db");
            assert_eq!(*kind, ResourceKind::Factory);
        }
        other => panic!("expected a register event, got {:?}", other),
    }
}

#[test]
fn test_callback_may_use_the_registry() {
    // The trace lock is released before the callback runs, so traced
    // operations from inside a callback must complete, not deadlock.
    let registry = Arc::new(Registry::new());
    registry.register_item("seed", 1i32).unwrap();

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    let inner = registry.clone();
    registry.set_trace_callback(move |event| {
        // the nested operations below emit their own events and re-enter
        // this callback; reacting to one outer name keeps that bounded
        if let RegistryEvent::Resolve { name, .. } = event {
            if name == "trigger" {
                let found = inner.contains("seed");
                let value = inner.resolve_cloned::<i32>("seed");
                inner.register_item("from_callback", 2i32).unwrap();
                sink.lock().unwrap().push((found, value.is_ok()));
            }
        }
    });

    let resolved = registry.resolve::<i32>("trigger");
    assert!(resolved.is_err());

    // the callback's traced operations completed and took effect
    assert_eq!(*observed.lock().unwrap(), vec![(true, true)]);
    assert_eq!(*registry.resolve::<i32>("from_callback").unwrap(), 2);
}

#[test]
fn test_callbacks_are_per_instance() {
    let registry_a = Registry::new();
    let registry_b = Registry::new();
    let events_a = capture_events(&registry_a);
    let events_b = capture_events(&registry_b);

    registry_a.register_item("only_a", 1i32).unwrap();

    assert_eq!(events_a.lock().unwrap().len(), 1);
    assert!(events_b.lock().unwrap().is_empty());
}
