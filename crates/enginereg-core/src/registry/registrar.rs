//! Engine registration and cleanup over an injected store.
//!
//! The registrar owns no state of its own: each operation opens the store,
//! does its reads and writes, and drops the handle. There is no isolation
//! across the enumerate-then-delete sequences of a forced registration or a
//! cleanup; a concurrent writer can make the scanned snapshot stale.

use super::store::{RegistryEntry, RegistryStore};
use crate::error::{EngineRegError, Result};
use crate::layout::{is_valid_engine_path, missing_engine_dirs};
use crate::platform::{normalize_engine_path, normalize_stored_path, normcase};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: String,
    /// Stored (normalized) engine path.
    pub path: String,
    /// Value previously stored under `id`, if any.
    pub previous: Option<String>,
    /// Other identifiers removed because they pointed at the same path.
    pub displaced: Vec<String>,
}

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Number of registrations inspected.
    pub examined: usize,
    /// Registrations deleted because their path no longer validates.
    pub removed: Vec<RegistryEntry>,
}

/// Registers engine installations in a [`RegistryStore`].
///
/// Generic over a store opener so callers choose the backend:
///
/// ```rust,ignore
/// let registrar = EngineRegistrar::new(open_platform_store);
/// registrar.register("{7F209AE1-0867-4B03-811D-243C9BAF2E74}", Path::new("."), true)?;
/// ```
pub struct EngineRegistrar<F> {
    open_store: F,
}

impl<F, S> EngineRegistrar<F>
where
    F: Fn() -> Result<S>,
    S: RegistryStore,
{
    pub fn new(open_store: F) -> Self {
        Self { open_store }
    }

    /// Register `path` under `id`.
    ///
    /// With `force`, any other registration of the same path is removed and an
    /// existing value under `id` is overwritten. Without it, an existing value
    /// under `id` fails the call with [`EngineRegError::AlreadyRegistered`] and
    /// nothing is written.
    pub fn register(&self, id: &str, path: &Path, force: bool) -> Result<Registration> {
        if !is_valid_engine_path(path) {
            warn!(
                "Rejecting {}: missing {:?}",
                path.display(),
                missing_engine_dirs(path)
            );
            return Err(EngineRegError::InvalidEnginePath {
                path: path.to_path_buf(),
            });
        }
        let normalized = normalize_engine_path(path)?;

        let store = (self.open_store)()?;
        let previous = store.get(id)?;
        let mut displaced = Vec::new();

        if force {
            // Drain the scan before deleting; index-based stores shift on delete.
            // The entry under `id` itself is left for `set` to overwrite.
            let duplicates: Vec<RegistryEntry> = store
                .entries()?
                .filter(|entry| match entry {
                    Ok(entry) => {
                        entry.name != id && normalize_stored_path(&entry.value) == normalized
                    }
                    Err(_) => true,
                })
                .collect::<Result<_>>()?;

            for entry in duplicates {
                store.delete(&entry.name)?;
                info!("Removed duplicate registration {} -> {}", entry.name, entry.value);
                displaced.push(entry.name);
            }
        } else if let Some(existing) = previous.clone() {
            return Err(EngineRegError::AlreadyRegistered {
                id: id.to_string(),
                existing,
            });
        }

        store.set(id, &normalized)?;
        info!("Registered engine {} -> {}", id, normalized);

        Ok(Registration {
            id: id.to_string(),
            path: normalized,
            previous,
            displaced,
        })
    }

    /// Remove every registration whose path no longer validates.
    pub fn cleanup(&self) -> Result<CleanupReport> {
        let store = (self.open_store)()?;
        let entries: Vec<RegistryEntry> = store.entries()?.collect::<Result<_>>()?;

        let mut report = CleanupReport {
            examined: entries.len(),
            removed: Vec::new(),
        };

        for entry in entries {
            let path = PathBuf::from(normcase(&entry.value));
            if is_valid_engine_path(&path) {
                debug!("Keeping {} -> {}", entry.name, entry.value);
                continue;
            }
            store.delete(&entry.name)?;
            info!("Removed stale registration {} -> {}", entry.name, entry.value);
            report.removed.push(entry);
        }

        Ok(report)
    }

    /// All registrations, sorted by identifier.
    pub fn list(&self) -> Result<Vec<RegistryEntry>> {
        let store = (self.open_store)()?;
        let mut entries: Vec<RegistryEntry> = store.entries()?.collect::<Result<_>>()?;
        entries.sort();
        Ok(entries)
    }
}
