//! A thread-safe, name-keyed resource registry.
//!
//! A [`Registry`] maps string names to resources. A resource is either an
//! *item* (a plain value, returned verbatim on every resolution) or a
//! *factory* (a closure invoked with the registry on every resolution).
//! Which one a name holds is chosen explicitly at registration time; there
//! is no runtime inspection of the stored value.
//!
//! # Examples
//!
//! ```
//! use resource_registry::Registry;
//!
//! let registry = Registry::new();
//!
//! // Register a plain item
//! registry.register_item("greeting", "Hello, World!".to_string()).unwrap();
//!
//! // Register a factory, invoked on every resolution
//! registry.register_factory("counter", |_registry| 42i32).unwrap();
//!
//! let message = registry.resolve::<String>("greeting").unwrap();
//! assert_eq!(&*message, "Hello, World!");
//!
//! let number = registry.resolve::<i32>("counter").unwrap();
//! assert_eq!(*number, 42);
//! ```

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use crate::{FactoryError, RegistryError, RegistryEvent};

/// Type-erased value as stored in the registry.
type AnyValue = Arc<dyn Any + Send + Sync>;

/// Type-erased factory closure. Receives the owning registry so a factory
/// can resolve other names; the registry's state lock is not held during
/// invocation.
type FactoryFn = dyn Fn(&Registry) -> Result<AnyValue, FactoryError> + Send + Sync;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the
/// registry is interacted with. It must be thread-safe because a registry
/// may be shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Whether a name is registered as an item or as a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A plain value returned verbatim on resolution.
    Item,
    /// A closure invoked on every resolution.
    Factory,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Item => write!(f, "item"),
            ResourceKind::Factory => write!(f, "factory"),
        }
    }
}

/// A registered resource. The tagged variant replaces any runtime
/// "is this callable?" detection: callers pick the kind at registration.
#[derive(Clone)]
enum Resource {
    Item(AnyValue),
    Factory(Arc<FactoryFn>),
}

impl Resource {
    fn kind(&self) -> ResourceKind {
        match self {
            Resource::Item(_) => ResourceKind::Item,
            Resource::Factory(_) => ResourceKind::Factory,
        }
    }
}

/// Mappings and lock flag, guarded by a single mutex so admission checks
/// and writes are atomic.
struct State {
    resources: HashMap<String, Resource>,
    locked: bool,
}

/// A name-keyed store resolving names to items or lazily-invoked factories.
///
/// The registry is thread-safe: the resource map and the lock flag live
/// under one mutex, and a poisoned mutex is recovered rather than surfaced
/// (poisoning only occurs if a thread panics while holding the lock, and
/// every critical section here is a plain map access).
///
/// Factories are re-invoked on **every** resolution; wrap a factory in a
/// [`crate::Memo`] to get memoized, once-only construction.
pub struct Registry {
    state: Mutex<State>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates an empty, unlocked registry.
    pub fn new() -> Self {
        Registry {
            state: Mutex::new(State {
                resources: HashMap::new(),
                locked: false,
            }),
            trace: Mutex::new(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry
    /// interaction.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned (due to a panic while holding the
    /// lock), this method automatically recovers by extracting the inner
    /// value.
    ///
    /// # Re-entrancy
    ///
    /// Neither the state lock nor the trace lock is held while the
    /// callback runs, so the callback may use the registry freely,
    /// including traced operations. Those operations emit their own
    /// events and re-enter the callback; a callback that reacts to every
    /// event must guard against unbounded recursion.
    ///
    /// # Example
    /// ```rust
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {:?}", event));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    ///
    /// This does not affect registered resources, only the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Convenience wrapper to emit a registry event using the current callback.
    ///
    /// The trace lock is released before the callback is invoked, so the
    /// callback may perform traced operations on this registry without
    /// deadlocking.
    fn emit_event(&self, event: &RegistryEvent) {
        // lock poisoning unlikely; if poisoned, keep emitting with recovered lock
        let callback = {
            let guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
            guard.as_ref().cloned()
        };
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Registers a plain item under `name`.
    ///
    /// The value is returned verbatim (as `Arc<T>`) on every resolution.
    /// Any previous registration under `name`, item or factory, is replaced.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Locked`] if the registry is locked
    /// - [`RegistryError::InvalidName`] if `name` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.register_item("answer", 42i32).unwrap();
    ///
    /// let answer = registry.resolve::<i32>("answer").unwrap();
    /// assert_eq!(*answer, 42);
    /// ```
    pub fn register_item<T: Send + Sync + 'static>(
        &self,
        name: &str,
        value: T,
    ) -> Result<(), RegistryError> {
        self.register_item_arc(name, Arc::new(value))
    }

    /// Registers an `Arc`-wrapped item under `name`.
    ///
    /// More efficient than [`Registry::register_item`] when you already have
    /// an `Arc`, as it avoids creating an additional allocation. This is
    /// also how a [`crate::Memo`] is stored as a resource in its own right.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Locked`] if the registry is locked
    /// - [`RegistryError::InvalidName`] if `name` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// let value = Arc::new("shared".to_string());
    /// registry.register_item_arc("config", value.clone()).unwrap();
    ///
    /// let retrieved = registry.resolve::<String>("config").unwrap();
    /// assert_eq!(&*retrieved, "shared");
    /// ```
    pub fn register_item_arc<T: Send + Sync + 'static>(
        &self,
        name: &str,
        value: Arc<T>,
    ) -> Result<(), RegistryError> {
        let value: AnyValue = value;
        self.insert(name, Resource::Item(value))
    }

    /// Registers a factory under `name`.
    ///
    /// The factory is invoked with the registry as its argument on **every**
    /// resolution of `name`; its result is `Arc`-wrapped fresh each call.
    /// Any previous registration under `name` is replaced.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Locked`] if the registry is locked
    /// - [`RegistryError::InvalidName`] if `name` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.register_item("base", 40i32).unwrap();
    /// registry
    ///     .register_factory("answer", |registry| {
    ///         // factories may resolve other names on the same registry
    ///         *registry.resolve::<i32>("base").unwrap() + 2
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(*registry.resolve::<i32>("answer").unwrap(), 42);
    /// ```
    pub fn register_factory<T, F>(&self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> T + Send + Sync + 'static,
    {
        self.register_try_factory(name, move |registry| Ok(factory(registry)))
    }

    /// Registers a factory that already yields an `Arc<T>`.
    ///
    /// Use this when the factory shares its result rather than producing a
    /// fresh value, most notably a [`crate::Memo`] resolver:
    ///
    /// ```
    /// use std::sync::Arc;
    /// use resource_registry::{Memo, Registry};
    ///
    /// let registry = Registry::new();
    /// let memo = Arc::new(Memo::new(|_| "expensive".to_string()));
    /// registry.register_arc_factory("cached", memo.resolver()).unwrap();
    ///
    /// let first = registry.resolve::<String>("cached").unwrap();
    /// let second = registry.resolve::<String>("cached").unwrap();
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Locked`] if the registry is locked
    /// - [`RegistryError::InvalidName`] if `name` is empty
    pub fn register_arc_factory<T, F>(&self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> Arc<T> + Send + Sync + 'static,
    {
        let wrapped: Arc<FactoryFn> = Arc::new(move |registry| {
            let value: AnyValue = factory(registry);
            Ok(value)
        });
        self.insert(name, Resource::Factory(wrapped))
    }

    /// Registers a fallible factory under `name`.
    ///
    /// A failure returned by the factory is not caught or wrapped with
    /// context; [`Registry::resolve`] surfaces it verbatim inside
    /// [`RegistryError::Factory`].
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Locked`] if the registry is locked
    /// - [`RegistryError::InvalidName`] if `name` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::{FactoryError, Registry, RegistryError};
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .register_try_factory("flaky", |_| -> Result<i32, FactoryError> {
    ///         Err("connection refused".into())
    ///     })
    ///     .unwrap();
    ///
    /// let err = registry.resolve::<i32>("flaky").unwrap_err();
    /// assert!(matches!(err, RegistryError::Factory(_)));
    /// ```
    pub fn register_try_factory<T, F>(&self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        let wrapped: Arc<FactoryFn> = Arc::new(move |registry| {
            factory(registry).map(|value| {
                let value: AnyValue = Arc::new(value);
                value
            })
        });
        self.insert(name, Resource::Factory(wrapped))
    }

    /// Admission checks plus the purge-and-write, all under one lock so a
    /// failed registration leaves the map untouched.
    fn insert(&self, name: &str, resource: Resource) -> Result<(), RegistryError> {
        let kind = resource.kind();
        {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            if state.locked {
                return Err(RegistryError::Locked);
            }
            if name.is_empty() {
                return Err(RegistryError::InvalidName);
            }
            // insert replaces the previous entry, whatever its kind
            state.resources.insert(name.to_owned(), resource);
        }

        self.emit_event(&RegistryEvent::Register {
            name: name.to_owned(),
            kind,
        });
        Ok(())
    }

    // -------------------------------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------------------------------

    /// Resolves `name` to an `Arc<T>`.
    ///
    /// - An item is returned directly (a clone of the stored `Arc`).
    /// - A factory is invoked with this registry and its result returned.
    ///   No caching happens here: resolving twice invokes the factory twice,
    ///   unless the factory is a [`crate::Memo`] resolver.
    ///
    /// The state lock is released before a factory runs, so factories may
    /// resolve other names (or even register new ones) on this registry.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if `name` is not registered
    /// - [`RegistryError::TypeMismatch`] if the resource is not a `T`
    /// - [`RegistryError::Factory`] if a fallible factory failed
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::{Registry, RegistryError};
    ///
    /// let registry = Registry::new();
    /// registry.register_item("greeting", "hi".to_string()).unwrap();
    ///
    /// let greeting = registry.resolve::<String>("greeting").unwrap();
    /// assert_eq!(&*greeting, "hi");
    ///
    /// // Looking up an unregistered name is a normal, handled outcome
    /// let missing = registry.resolve::<String>("missing");
    /// assert_eq!(
    ///     missing.unwrap_err(),
    ///     RegistryError::NotFound { name: "missing".to_string() }
    /// );
    /// ```
    pub fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        let resource = {
            let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            state.resources.get(name).cloned()
        };

        let result = match resource {
            Some(Resource::Item(value)) => downcast_value::<T>(name, value),
            Some(Resource::Factory(factory)) => match factory(self) {
                Ok(value) => downcast_value::<T>(name, value),
                Err(source) => Err(RegistryError::Factory(source)),
            },
            None => Err(RegistryError::NotFound {
                name: name.to_owned(),
            }),
        };

        self.emit_event(&RegistryEvent::Resolve {
            name: name.to_owned(),
            found: result.is_ok(),
        });

        result
    }

    /// Resolves `name` to an owned, cloned `T`.
    ///
    /// Useful when you need to own the value rather than share it via
    /// `Arc<T>`. The type `T` must implement `Clone`.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::resolve`].
    ///
    /// # Examples
    /// ```
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.register_item("greeting", "hello".to_string()).unwrap();
    /// let value: String = registry.resolve_cloned("greeting").unwrap();
    /// assert_eq!(value, "hello");
    /// ```
    pub fn resolve_cloned<T: Send + Sync + Clone + 'static>(
        &self,
        name: &str,
    ) -> Result<T, RegistryError> {
        let arc = self.resolve::<T>(name)?;
        Ok((*arc).clone())
    }

    /// Returns an owned handle to the factory registered under `name`.
    ///
    /// The handle is a clone of the internal closure reference, not a view
    /// into registry storage: re-registering `name` later does not change
    /// what an already-obtained handle invokes.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `name` is absent **or** registered as
    /// an item. An item does not qualify even if it happens to hold
    /// something invocable.
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.register_factory("id", |_| 7u32).unwrap();
    ///
    /// let handle = registry.factory("id").unwrap();
    /// assert_eq!(*handle.invoke::<u32>(&registry).unwrap(), 7);
    /// ```
    pub fn factory(&self, name: &str) -> Result<FactoryHandle, RegistryError> {
        let factory = {
            let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            match state.resources.get(name) {
                Some(Resource::Factory(factory)) => Some(factory.clone()),
                _ => None,
            }
        };

        let result = match factory {
            Some(inner) => Ok(FactoryHandle {
                name: name.to_owned(),
                inner,
            }),
            None => Err(RegistryError::NotFound {
                name: name.to_owned(),
            }),
        };

        self.emit_event(&RegistryEvent::Factory {
            name: name.to_owned(),
            found: result.is_ok(),
        });

        result
    }

    /// Checks whether any resource is registered under `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// assert!(!registry.contains("db"));
    /// registry.register_item("db", "postgres://localhost".to_string()).unwrap();
    /// assert!(registry.contains("db"));
    /// ```
    pub fn contains(&self, name: &str) -> bool {
        let found = {
            let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            state.resources.contains_key(name)
        };

        self.emit_event(&RegistryEvent::Contains {
            name: name.to_owned(),
            found,
        });

        found
    }

    /// Returns how `name` is registered, or `None` if it isn't.
    pub fn kind(&self, name: &str) -> Option<ResourceKind> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.resources.get(name).map(Resource::kind)
    }

    // -------------------------------------------------------------------------------------------------
    // Locking
    // -------------------------------------------------------------------------------------------------

    /// Sets the lock flag. Idempotent, never fails.
    ///
    /// Locking never clears existing entries; it only blocks subsequent
    /// registration. Resolution keeps working on a locked registry.
    pub fn set_locked(&self, locked: bool) {
        {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            state.locked = locked;
        }
        self.emit_event(&RegistryEvent::Lock { locked });
    }

    /// Locks the registry so that no new resources can be registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_registry::{Registry, RegistryError};
    ///
    /// let registry = Registry::new();
    /// registry.register_item("answer", 42i32).unwrap();
    /// registry.lock();
    ///
    /// assert_eq!(registry.register_item("other", 1i32), Err(RegistryError::Locked));
    /// assert_eq!(*registry.resolve::<i32>("answer").unwrap(), 42);
    /// ```
    pub fn lock(&self) {
        self.set_locked(true);
    }

    /// Unlocks the registry, allowing registration again.
    pub fn unlock(&self) {
        self.set_locked(false);
    }

    /// Returns the current lock state.
    pub fn is_locked(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.locked
    }

    /// Removes all registered resources.
    ///
    /// Primarily intended for tests on shared (macro-defined) registries.
    /// Clearing counts as a mutation, so it respects the lock. It does NOT
    /// affect already-resolved `Arc<T>` values or the tracing callback.
    #[doc(hidden)]
    pub fn clear(&self) -> Result<(), RegistryError> {
        {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            if state.locked {
                return Err(RegistryError::Locked);
            }
            state.resources.clear();
        }
        self.emit_event(&RegistryEvent::Clear {});
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f.debug_struct("Registry")
            .field("resources", &state.resources.len())
            .field("locked", &state.locked)
            .finish()
    }
}

/// An owned handle to a registered factory.
///
/// Obtained from [`Registry::factory`]. Cloning the handle clones the
/// reference to the same closure.
#[derive(Clone)]
pub struct FactoryHandle {
    name: String,
    inner: Arc<FactoryFn>,
}

impl FactoryHandle {
    /// The name this handle was fetched under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the factory with `registry` and downcasts its result.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::TypeMismatch`] if the factory's product is not a `T`
    /// - [`RegistryError::Factory`] if the factory failed
    pub fn invoke<T: Send + Sync + 'static>(
        &self,
        registry: &Registry,
    ) -> Result<Arc<T>, RegistryError> {
        match (self.inner)(registry) {
            Ok(value) => downcast_value::<T>(&self.name, value),
            Err(source) => Err(RegistryError::Factory(source)),
        }
    }
}

impl fmt::Debug for FactoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryHandle")
            .field("name", &self.name)
            .finish()
    }
}

fn downcast_value<T: Send + Sync + 'static>(
    name: &str,
    value: AnyValue,
) -> Result<Arc<T>, RegistryError> {
    value
        .downcast::<T>()
        .map_err(|_| RegistryError::TypeMismatch {
            name: name.to_owned(),
            type_name: std::any::type_name::<T>(),
        })
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
