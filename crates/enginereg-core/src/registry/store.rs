//! Key-value store abstraction over a persistent registration namespace.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One identifier → engine path registration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Registration identifier (value name in the store).
    pub name: String,
    /// Engine path string.
    pub value: String,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Sequence of entries produced by [`RegistryStore::entries`].
///
/// Backends choose whether it is read lazily (Windows registry) or as a
/// snapshot taken when `entries` is called (SQLite, memory).
pub type Entries<'a> = Box<dyn Iterator<Item = Result<RegistryEntry>> + 'a>;

/// A named, persistent, flat string → string namespace.
///
/// Implementations persist writes immediately; there is no commit step.
/// Enumeration order is unspecified and may change between calls. Mutating
/// the store while an [`Entries`] iterator is live (from this process or
/// another) has unspecified effect on what the iterator yields, so callers
/// that delete during a scan should drain the iterator first.
pub trait RegistryStore {
    /// Namespace this handle is bound to, for diagnostics.
    fn namespace(&self) -> &str;

    /// Get a value. Missing keys are `Ok(None)`.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Create or overwrite a value.
    fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Remove a value. Returns false if it was not present.
    fn delete(&self, name: &str) -> Result<bool>;

    /// Enumerate all values in the namespace.
    fn entries(&self) -> Result<Entries<'_>>;
}

impl<T: RegistryStore + ?Sized> RegistryStore for &T {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        (**self).set(name, value)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        (**self).delete(name)
    }

    fn entries(&self) -> Result<Entries<'_>> {
        (**self).entries()
    }
}

impl<T: RegistryStore + ?Sized> RegistryStore for Box<T> {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        (**self).set(name, value)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        (**self).delete(name)
    }

    fn entries(&self) -> Result<Entries<'_>> {
        (**self).entries()
    }
}

impl<T: RegistryStore + ?Sized> RegistryStore for Arc<T> {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        (**self).set(name, value)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        (**self).delete(name)
    }

    fn entries(&self) -> Result<Entries<'_>> {
        (**self).entries()
    }
}
