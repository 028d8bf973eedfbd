//! Integration tests for the `Memo` wrapper.
//!
//! A memo's factory runs at most once between creation (or invalidation)
//! and the next resolution, no matter how many times or with which
//! arguments the memo is resolved.

use resource_registry::{Memo, Registry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A stand-in for something with expensive, side-effecting construction.
struct Connection {
    id: usize,
}

#[test]
fn test_three_resolutions_one_invocation() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let memo = Memo::new(move |_| Connection {
        id: counter.fetch_add(1, Ordering::SeqCst),
    });

    let a = memo.resolve(None);
    let b = memo.resolve(None);
    let c = memo.resolve(None);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(a.id, 0);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
}

#[test]
fn test_invalidation_triggers_exactly_one_reinvocation() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let memo = Memo::new(move |_| Connection {
        id: counter.fetch_add(1, Ordering::SeqCst),
    });

    let first = memo.resolve(None);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    memo.invalidate();

    let second = memo.resolve(None);
    let third = memo.resolve(None);
    assert_eq!(count.load(Ordering::SeqCst), 2);

    // the post-invalidation value reflects the new invocation
    assert_eq!(first.id, 0);
    assert_eq!(second.id, 1);
    assert!(Arc::ptr_eq(&second, &third));
}

#[test]
fn test_populating_argument_wins() {
    let registry = Registry::new();
    registry.register_item("suffix", "-live".to_string()).unwrap();

    let memo = Memo::new(|registry: Option<&Registry>| match registry {
        Some(registry) => format!("conn{}", registry.resolve::<String>("suffix").unwrap()),
        None => "conn-detached".to_string(),
    });

    // the first call populates the cache with its own argument...
    assert_eq!(&*memo.resolve(None), "conn-detached");
    // ...and later arguments are silently ignored
    assert_eq!(&*memo.resolve(Some(&registry)), "conn-detached");
}

#[test]
fn test_memo_registered_in_place_of_a_factory() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let registry = Registry::new();
    let memo = Arc::new(Memo::new(move |_| Connection {
        id: counter.fetch_add(1, Ordering::SeqCst),
    }));

    registry
        .register_arc_factory("db", memo.resolver())
        .unwrap();

    // registry resolution is transparently memoized
    let a = registry.resolve::<Connection>("db").unwrap();
    let b = registry.resolve::<Connection>("db").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&a, &b));

    // the memo owner can still force a rebuild
    memo.invalidate();
    let c = registry.resolve::<Connection>("db").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(c.id, 1);
}

#[test]
fn test_memo_factory_can_use_the_registry() {
    let registry = Registry::new();
    registry
        .register_item("dsn", "postgres://localhost".to_string())
        .unwrap();

    let memo = Arc::new(Memo::new(|registry: Option<&Registry>| {
        let registry = registry.expect("registered resolver always passes the registry");
        registry.resolve_cloned::<String>("dsn").unwrap()
    }));

    registry
        .register_arc_factory("connection", memo.resolver())
        .unwrap();

    let conn = registry.resolve::<String>("connection").unwrap();
    assert_eq!(&*conn, "postgres://localhost");
}

#[test]
fn test_factory_panic_propagates_and_leaves_cache_empty() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let memo = Memo::new(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("construction failed");
        }
        Connection { id: 7 }
    });

    // the first epoch panics; the panic reaches the caller uncaught
    let result = catch_unwind(AssertUnwindSafe(|| memo.resolve(None)));
    assert!(result.is_err());
    assert!(!memo.is_cached());

    // the cache is still empty, so the next resolve re-invokes the
    // factory, which now succeeds and populates it
    let conn = memo.resolve(None);
    assert_eq!(conn.id, 7);
    assert!(memo.is_cached());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_memo_stored_as_an_item_resolves_to_itself() {
    let registry = Registry::new();
    let memo = Arc::new(Memo::new(|_| 42i32));

    // stored as a plain item, the registry hands back the memo object
    registry.register_item_arc("lazy_answer", memo.clone()).unwrap();

    let stored: Arc<Memo<i32>> = registry.resolve("lazy_answer").unwrap();
    assert!(Arc::ptr_eq(&stored, &memo));
    assert!(!stored.is_cached());

    // resolving through the retrieved memo populates the shared cache
    assert_eq!(*stored.resolve(None), 42);
    assert!(memo.is_cached());
}
