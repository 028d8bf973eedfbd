//! Basic usage example for resource-registry.
//!
//! Demonstrates:
//! - Registering items and factories under string names
//! - Resolving values with `resolve()` (returns `Arc<T>`)
//! - Resolving owned clones with `resolve_cloned()` (returns `T`)
//! - Locking the namespace after setup
//!
//! Run with: `cargo run --example basic_usage`

use resource_registry::{Registry, RegistryError};
use std::sync::Arc;

// Custom struct to demonstrate complex types
#[derive(Debug, Clone, PartialEq)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

fn main() {
    println!("=== resource-registry: Basic Usage ===\n");

    let registry = Registry::new();

    // -------------------------------------------------------------------------
    // 1. Register items
    // -------------------------------------------------------------------------
    println!("1. Registering items...");

    registry.register_item("answer", 42i32).unwrap();
    registry
        .register_item("greeting", "Hello, World!".to_string())
        .unwrap();
    registry
        .register_item(
            "config",
            AppConfig {
                name: "demo".to_string(),
                version: 1,
                debug_mode: true,
            },
        )
        .unwrap();

    println!("   Registered: answer(42), greeting, config");

    // -------------------------------------------------------------------------
    // 2. Register a factory
    // -------------------------------------------------------------------------
    println!("\n2. Registering a factory...");

    registry
        .register_factory("banner", |registry| {
            let greeting = registry.resolve::<String>("greeting").unwrap();
            let config = registry.resolve::<AppConfig>("config").unwrap();
            format!("{} (from {} v{})", greeting, config.name, config.version)
        })
        .unwrap();

    println!("   Registered: banner (built from greeting + config)");

    // -------------------------------------------------------------------------
    // 3. Resolve values
    // -------------------------------------------------------------------------
    println!("\n3. Resolving values...");

    let answer: Arc<i32> = registry.resolve("answer").unwrap();
    let banner: Arc<String> = registry.resolve("banner").unwrap();

    println!("   answer = {}", answer);
    println!("   banner = {}", banner);

    // -------------------------------------------------------------------------
    // 4. Resolve an owned clone
    // -------------------------------------------------------------------------
    println!("\n4. Resolving an owned clone...");

    let config: AppConfig = registry.resolve_cloned("config").unwrap();
    println!("   config = {:?}", config);

    // -------------------------------------------------------------------------
    // 5. Missing names are a normal, handled outcome
    // -------------------------------------------------------------------------
    println!("\n5. Resolving a missing name...");

    match registry.resolve::<String>("missing") {
        Ok(_) => println!("   unexpected!"),
        Err(err) => println!("   error (as expected): {}", err),
    }

    // -------------------------------------------------------------------------
    // 6. Lock the namespace
    // -------------------------------------------------------------------------
    println!("\n6. Locking the registry...");

    registry.lock();

    match registry.register_item("late", 1i32) {
        Err(RegistryError::Locked) => println!("   registration blocked: registry is locked"),
        other => println!("   unexpected: {:?}", other),
    }

    let answer_again: Arc<i32> = registry.resolve("answer").unwrap();
    println!("   resolution still works: answer = {}", answer_again);

    println!("\n=== Done ===");
}
