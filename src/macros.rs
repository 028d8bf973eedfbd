//! Macros for declaring global registries.
//!
//! The crate's core [`crate::Registry`] is instance-based; this module
//! provides a macro for the common "one shared registry per concern"
//! setup with zero external dependencies.

/// Declares a module wrapping a lazily-initialized global [`crate::Registry`].
///
/// The macro generates a module containing:
/// - A hidden `LazyLock<Registry>` static
/// - Free functions delegating to it
/// - `registry()` for direct access to the instance
///
/// # Examples
///
/// ```rust
/// use resource_registry::define_registry;
///
/// // Create a global registry
/// define_registry!(app);
///
/// // Register resources (ergonomic free functions)
/// app::register_item("answer", 42i32).unwrap();
/// app::register_factory("doubled", |registry| {
///     *registry.resolve::<i32>("answer").unwrap() * 2
/// }).unwrap();
///
/// assert_eq!(*app::resolve::<i32>("answer").unwrap(), 42);
/// assert_eq!(*app::resolve::<i32>("doubled").unwrap(), 84);
/// ```
///
/// # Multiple Registries
///
/// You can create multiple isolated registries:
///
/// ```rust
/// use resource_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// // Each registry is completely isolated
/// database::register_item("url", "postgres://localhost".to_string()).unwrap();
/// cache::register_item("url", "redis://localhost".to_string()).unwrap();
///
/// assert_ne!(
///     database::resolve::<String>("url").unwrap(),
///     cache::resolve::<String>("url").unwrap()
/// );
/// ```
///
/// # Instance Access
///
/// If you need the full [`crate::Registry`] API (locking, factory handles,
/// fallible factories), `registry()` exposes the instance:
///
/// ```rust
/// use resource_registry::define_registry;
///
/// define_registry!(frozen);
///
/// frozen::register_item("answer", 100i32).unwrap();
/// frozen::registry().lock();
/// assert!(frozen::register_item("other", 1i32).is_err());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Registry instance (module-private)
            static REGISTRY: LazyLock<$crate::Registry> = LazyLock::new($crate::Registry::new);

            /// Access the underlying registry instance.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            // Free functions for ergonomic usage - they delegate to the instance

            /// Register a plain item under `name`.
            pub fn register_item<T: Send + Sync + 'static>(
                name: &str,
                value: T,
            ) -> Result<(), $crate::RegistryError> {
                REGISTRY.register_item(name, value)
            }

            /// Register a factory under `name`, invoked on every resolution.
            pub fn register_factory<T, F>(name: &str, factory: F) -> Result<(), $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: Fn(&$crate::Registry) -> T + Send + Sync + 'static,
            {
                REGISTRY.register_factory(name, factory)
            }

            /// Resolve `name` to an `Arc<T>`.
            pub fn resolve<T: Send + Sync + 'static>(
                name: &str,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.resolve(name)
            }

            /// Resolve `name` to an owned, cloned `T`.
            pub fn resolve_cloned<T: Send + Sync + Clone + 'static>(
                name: &str,
            ) -> Result<T, $crate::RegistryError> {
                REGISTRY.resolve_cloned(name)
            }

            /// Check whether any resource is registered under `name`.
            pub fn contains(name: &str) -> bool {
                REGISTRY.contains(name)
            }

            /// Lock the registry against further registration.
            pub fn lock() {
                REGISTRY.lock()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
