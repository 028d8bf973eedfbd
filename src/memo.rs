//! Memoizing wrapper for expensive factories.
//!
//! A [`Memo`] wraps a single factory closure and guarantees it runs at most
//! once per epoch: the span between construction (or the last
//! [`Memo::invalidate`]) and the next resolution. It is the companion to
//! [`crate::Registry`], whose own factories are re-invoked on every
//! resolution.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::Registry;

/// Caches a factory's result after the first invocation.
///
/// `resolve` populates the cache lazily; later calls return the cached
/// `Arc<T>` without re-invoking the factory, whatever argument they pass.
/// `invalidate` clears the cache so the next `resolve` recomputes.
///
/// The cache mutex is held across the factory call, so even with concurrent
/// callers the factory runs at most once per epoch. The factory must not
/// resolve through the same `Memo`, as that would deadlock.
///
/// # Examples
///
/// ```
/// use resource_registry::Memo;
///
/// let memo = Memo::new(|_| "expensive computation".to_string());
///
/// let first = memo.resolve(None);
/// let second = memo.resolve(None);
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
///
/// memo.invalidate();
/// let third = memo.resolve(None);
/// assert!(!std::sync::Arc::ptr_eq(&first, &third));
/// ```
pub struct Memo<T> {
    /// Produces the value; receives the registry passed to the populating
    /// `resolve` call, or `None` when resolved standalone.
    factory: Box<dyn Fn(Option<&Registry>) -> T + Send + Sync>,
    cached: Mutex<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> Memo<T> {
    /// Wraps `factory`; the cache starts empty.
    pub fn new(factory: impl Fn(Option<&Registry>) -> T + Send + Sync + 'static) -> Self {
        Memo {
            factory: Box::new(factory),
            cached: Mutex::new(None),
        }
    }

    /// Returns the memoized value, invoking the factory on the first call.
    ///
    /// `registry` is only ever seen by the factory on the invocation that
    /// populates the cache; once populated, later calls return the cache
    /// unconditionally and their argument has no effect.
    ///
    /// A panic in the factory propagates to the caller and leaves the cache
    /// empty.
    pub fn resolve(&self, registry: Option<&Registry>) -> Arc<T> {
        let mut cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(value) = cached.as_ref() {
            return value.clone();
        }

        let value = Arc::new((self.factory)(registry));
        *cached = Some(value.clone());
        value
    }

    /// Clears the cached value; the next [`Memo::resolve`] recomputes.
    ///
    /// Never fails, and does nothing if the cache is already empty.
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        *cached = None;
    }

    /// Whether a value is currently cached.
    pub fn is_cached(&self) -> bool {
        let cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        cached.is_some()
    }

    /// Returns a closure suitable for [`Registry::register_arc_factory`],
    /// so registry resolution of the name goes through this memo.
    ///
    /// This is how a `Memo` stands in for a raw factory: the registry calls
    /// the closure on every resolution, but the memo only invokes the
    /// wrapped factory once.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use resource_registry::{Memo, Registry};
    ///
    /// let registry = Registry::new();
    /// let memo = Arc::new(Memo::new(|_| vec![1, 2, 3]));
    /// registry.register_arc_factory("data", memo.resolver()).unwrap();
    ///
    /// let a = registry.resolve::<Vec<i32>>("data").unwrap();
    /// let b = registry.resolve::<Vec<i32>>("data").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn resolver(self: &Arc<Self>) -> impl Fn(&Registry) -> Arc<T> + Send + Sync + 'static {
        let memo = Arc::clone(self);
        move |registry| memo.resolve(Some(registry))
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        f.debug_struct("Memo")
            .field("cached", &cached.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
