//! # Resource Registry
//!
//! A thread-safe, name-keyed dependency injection registry with lazy
//! factories and a memoizing singleton wrapper.
//!
//! A [`Registry`] maps string names to resources: either *items* (plain
//! values, returned verbatim) or *factories* (closures invoked with the
//! registry on every resolution). Which one a name holds is chosen
//! explicitly at registration time. A [`Memo`] wraps a factory so its
//! construction logic runs at most once, with manual invalidation.
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_registry::Registry;
//!
//! let registry = Registry::new();
//!
//! // Register a value
//! registry.register_item("greeting", "Hello, World!".to_string()).unwrap();
//!
//! // Retrieve the value
//! let message = registry.resolve::<String>("greeting").unwrap();
//! assert_eq!(&*message, "Hello, World!");
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: all operations are safe to use across multiple threads
//! - **Type-safe**: values are stored type-erased and retrieved with full type information
//! - **Explicit kinds**: items and factories are distinct registrations, never guessed
//! - **Lockable namespace**: freeze a registry after setup with [`Registry::lock`]
//! - **Memoization**: wrap expensive factories in a [`Memo`] for once-only construction
//! - **Tracing support**: optional callback system for monitoring registry operations
//!
//! ## Main Types
//!
//! - [`Registry`] - the name-keyed resource store
//! - [`Memo`] - memoizing wrapper around a single factory
//! - [`FactoryHandle`] - owned handle to a registered factory
//! - [`RegistryError`] - everything that can go wrong
//! - [`define_registry!`] - declare a lazily-initialized global registry

mod macros;
mod memo;
mod registry;
mod registry_error;
mod registry_event;

// Re-export the main public API
pub use memo::Memo;
pub use registry::{FactoryHandle, Registry, ResourceKind, TraceCallback};
pub use registry_error::{FactoryError, RegistryError};
pub use registry_event::RegistryEvent;
