//! Memoized factory example for resource-registry.
//!
//! Demonstrates:
//! - Raw factories producing a fresh value on every resolution
//! - Wrapping a factory in a `Memo` for once-only construction
//! - Registering the memo's resolver so registry lookups are memoized
//! - Manual invalidation to force a rebuild
//!
//! Run with: `cargo run --example memoized_factories`

use resource_registry::{Memo, Registry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Pretend-expensive resource with observable construction.
#[derive(Debug)]
struct Connection {
    id: usize,
    dsn: String,
}

fn main() {
    println!("=== resource-registry: Memoized Factories ===\n");

    let registry = Registry::new();
    registry
        .register_item("dsn", "postgres://localhost/demo".to_string())
        .unwrap();

    let constructed = Arc::new(AtomicUsize::new(0));

    // -------------------------------------------------------------------------
    // 1. A raw factory connects every time
    // -------------------------------------------------------------------------
    println!("1. Raw factory (no memoization)...");

    let counter = constructed.clone();
    registry
        .register_factory("db", move |registry: &Registry| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            println!("   ... opening connection #{id}");
            Connection {
                id,
                dsn: registry.resolve_cloned::<String>("dsn").unwrap(),
            }
        })
        .unwrap();

    let a = registry.resolve::<Connection>("db").unwrap();
    let b = registry.resolve::<Connection>("db").unwrap();
    println!("   resolved ids: {} and {} (distinct connections)", a.id, b.id);

    // -------------------------------------------------------------------------
    // 2. Wrap the same logic in a Memo
    // -------------------------------------------------------------------------
    println!("\n2. Memoized factory...");

    let counter = constructed.clone();
    let memo = Arc::new(Memo::new(move |registry: Option<&Registry>| {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        println!("   ... opening connection #{id}");
        Connection {
            id,
            dsn: registry
                .map(|r| r.resolve_cloned::<String>("dsn").unwrap())
                .unwrap_or_default(),
        }
    }));

    // replace the raw factory with the memoized resolver
    registry
        .register_arc_factory("db", memo.resolver())
        .unwrap();

    let c = registry.resolve::<Connection>("db").unwrap();
    let d = registry.resolve::<Connection>("db").unwrap();
    println!(
        "   resolved ids: {} and {} (same connection: {})",
        c.id,
        d.id,
        Arc::ptr_eq(&c, &d)
    );
    println!("   dsn seen by the factory: {}", c.dsn);

    // -------------------------------------------------------------------------
    // 3. Invalidate to force a rebuild
    // -------------------------------------------------------------------------
    println!("\n3. Invalidating the memo...");

    memo.invalidate();
    let e = registry.resolve::<Connection>("db").unwrap();
    println!("   next resolution rebuilt: id {}", e.id);

    println!(
        "\n   total constructions: {}",
        constructed.load(Ordering::SeqCst)
    );
    println!("\n=== Done ===");
}
