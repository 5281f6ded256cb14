//! In-memory registry store for tests and embedding.

use super::store::{Entries, RegistryEntry, RegistryStore};
use crate::error::{EngineRegError, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Non-persistent [`RegistryStore`] backed by a sorted map.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            namespace: "memory".to_string(),
            values: Mutex::new(BTreeMap::new()),
        }
    }

    /// Build a store pre-populated with `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.lock_values()?.clone())
    }

    fn lock_values(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.values.lock().map_err(|_| {
            EngineRegError::store_access(
                self.namespace.clone(),
                "Failed to acquire memory store lock",
                None,
            )
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lock_values()?.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.lock_values()?
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.lock_values()?.remove(name).is_some())
    }

    fn entries(&self) -> Result<Entries<'_>> {
        let entries: Vec<RegistryEntry> = self
            .lock_values()?
            .iter()
            .map(|(name, value)| RegistryEntry::new(name.as_str(), value.as_str()))
            .collect();
        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("E1").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("E1", "/engines/a").unwrap();
        store.set("E1", "/engines/b").unwrap();

        assert_eq!(store.get("E1").unwrap().as_deref(), Some("/engines/b"));
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let store = MemoryStore::from_pairs([("E1", "/engines/a")]);

        assert!(!store.delete("E2").unwrap());
        assert!(store.delete("E1").unwrap());
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_entries_lists_everything() {
        let store = MemoryStore::from_pairs([("E2", "/engines/b"), ("E1", "/engines/a")]);

        let entries: Vec<RegistryEntry> = store.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&RegistryEntry::new("E1", "/engines/a")));
        assert!(entries.contains(&RegistryEntry::new("E2", "/engines/b")));
    }

    #[test]
    fn test_entries_snapshot_survives_deletes() {
        let store = MemoryStore::from_pairs([("E1", "/a"), ("E2", "/b"), ("E3", "/c")]);

        let mut seen = 0;
        for entry in store.entries().unwrap() {
            store.delete(&entry.unwrap().name).unwrap();
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert!(store.snapshot().unwrap().is_empty());
    }
}
