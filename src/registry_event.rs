use crate::ResourceKind;

/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via
/// `Registry::set_trace_callback`. The `Clone` derive allows callbacks to
/// store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use resource_registry::{RegistryEvent, ResourceKind};
///
/// let event = RegistryEvent::Register {
///     name: "db".to_string(),
///     kind: ResourceKind::Factory,
/// };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A resource was registered under a name.
    Register {
        /// The name the resource was registered under
        name: String,
        /// Whether it was stored as an item or a factory
        kind: ResourceKind,
    },

    /// A resource was requested from the registry.
    Resolve {
        /// The name that was requested
        name: String,
        /// Whether resolution succeeded
        found: bool,
    },

    /// A raw factory handle was requested.
    Factory {
        /// The name that was requested
        name: String,
        /// Whether a factory exists under the name
        found: bool,
    },

    /// A name existence check was performed.
    Contains {
        /// The name that was checked
        name: String,
        /// Whether the name exists in the registry
        found: bool,
    },

    /// The lock flag was set or cleared.
    Lock {
        /// The new lock state
        locked: bool,
    },

    /// The registry was cleared.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { name, kind } => {
                write!(f, "register {{ name: {}, kind: {} }}", name, kind)
            }
            RegistryEvent::Resolve { name, found } => {
                write!(f, "resolve {{ name: {}, found: {} }}", name, found)
            }
            RegistryEvent::Factory { name, found } => {
                write!(f, "factory {{ name: {}, found: {} }}", name, found)
            }
            RegistryEvent::Contains { name, found } => {
                write!(f, "contains {{ name: {}, found: {} }}", name, found)
            }
            RegistryEvent::Lock { locked } => write!(f, "lock {{ locked: {} }}", locked),
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
