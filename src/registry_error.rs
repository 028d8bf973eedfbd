use std::fmt;

/// Boxed error produced by a fallible factory.
///
/// Factories registered with `Registry::register_try_factory` return this on
/// failure; the registry surfaces it unwrapped inside
/// [`RegistryError::Factory`].
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum RegistryError {
    /// A malformed (empty) name was supplied to a registration call.
    InvalidName,
    /// A mutation was attempted while the registry namespace is locked.
    Locked,
    /// No resource is registered under the requested name.
    NotFound { name: String },
    /// A resource exists under the name but holds a different type.
    TypeMismatch {
        name: String,
        type_name: &'static str,
    },
    /// A fallible factory failed; the inner error is the factory's own,
    /// passed through verbatim.
    Factory(FactoryError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidName => write!(f, "Resource name must not be empty"),
            RegistryError::Locked => {
                write!(f, "Can't register resources when the registry is locked")
            }
            RegistryError::NotFound { name } => write!(f, "Resource not found for '{name}'"),
            RegistryError::TypeMismatch { name, type_name } => {
                write!(f, "Type mismatch for '{name}': expected {type_name}")
            }
            RegistryError::Factory(source) => write!(f, "Factory failed: {source}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Factory(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

// Manual impl because `FactoryError` is not `PartialEq`; factory errors
// compare by rendered message, which is enough for test assertions.
impl PartialEq for RegistryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RegistryError::InvalidName, RegistryError::InvalidName) => true,
            (RegistryError::Locked, RegistryError::Locked) => true,
            (RegistryError::NotFound { name: a }, RegistryError::NotFound { name: b }) => a == b,
            (
                RegistryError::TypeMismatch {
                    name: a,
                    type_name: ta,
                },
                RegistryError::TypeMismatch {
                    name: b,
                    type_name: tb,
                },
            ) => a == b && ta == tb,
            (RegistryError::Factory(a), RegistryError::Factory(b)) => {
                a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_display() {
        let err = RegistryError::InvalidName;
        assert_eq!(err.to_string(), "Resource name must not be empty");
    }

    #[test]
    fn test_locked_display() {
        let err = RegistryError::Locked;
        assert_eq!(
            err.to_string(),
            "Can't register resources when the registry is locked"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = RegistryError::NotFound {
            name: "db".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found for 'db'");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = RegistryError::TypeMismatch {
            name: "db".to_string(),
            type_name: "i32",
        };
        assert_eq!(err.to_string(), "Type mismatch for 'db': expected i32");
    }

    #[test]
    fn test_factory_display_and_source() {
        let inner: FactoryError = "connection refused".into();
        let err = RegistryError::Factory(inner);
        assert_eq!(err.to_string(), "Factory failed: connection refused");

        use std::error::Error;
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
    }

    #[test]
    fn test_debug_format() {
        let err = RegistryError::Locked;
        assert_eq!(format!("{:?}", err), "Locked");
    }

    #[test]
    fn test_equality() {
        assert_eq!(RegistryError::Locked, RegistryError::Locked);
        assert_ne!(RegistryError::Locked, RegistryError::InvalidName);
        assert_eq!(
            RegistryError::NotFound { name: "a".into() },
            RegistryError::NotFound { name: "a".into() }
        );
        assert_ne!(
            RegistryError::NotFound { name: "a".into() },
            RegistryError::NotFound { name: "b".into() }
        );
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &RegistryError::NotFound { name: "x".into() };
        assert_eq!(err.to_string(), "Resource not found for 'x'");
    }
}
