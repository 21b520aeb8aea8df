//! In-memory artifact store using `DashMap`.
//!
//! Bundles are read into memory on `put` and the source directory is removed,
//! so nothing survives a process restart. Useful for dry runs and tests.

use std::collections::HashMap;
use std::path::Path;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{validate_key, ArtifactStore};
use crate::{Error, Result};

/// Files of one bundle, keyed by `/`-separated path relative to the bundle root.
type Bundle = HashMap<String, Vec<u8>>;

/// In-memory artifact store.
///
/// # Example
///
/// ```rust
/// use downforce::kv::{ArtifactStore, MemoryArtifactStore};
///
/// let store = MemoryArtifactStore::new();
/// assert!(store.is_empty());
/// assert!(!store.contains("-1~-0.640804").unwrap());
/// ```
pub struct MemoryArtifactStore {
    store: DashMap<String, Bundle>,
}

impl MemoryArtifactStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Create with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: DashMap::with_capacity(capacity),
        }
    }

    /// Get the number of bundles in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clear all bundles.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read_bundle(root: &Path, dir: &Path, bundle: &mut Bundle) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            read_bundle(root, &path, bundle)?;
        } else {
            let relative = path
                .strip_prefix(root)
                .map_err(|e| Error::StorageError(format!("artifact outside bundle: {e}")))?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            bundle.insert(relative, std::fs::read(&path)?);
        }
    }
    Ok(())
}

impl ArtifactStore for MemoryArtifactStore {
    fn contains(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.store.contains_key(key))
    }

    fn get(&self, key: &str, file: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self
            .store
            .get(key)
            .and_then(|bundle| bundle.value().get(file).cloned()))
    }

    fn put(&self, key: &str, artifacts: &Path) -> Result<()> {
        validate_key(key)?;
        if !artifacts.is_dir() {
            return Err(Error::StorageError(format!(
                "artifact directory {} does not exist",
                artifacts.display()
            )));
        }
        match self.store.entry(key.to_string()) {
            Entry::Occupied(_) => Err(Error::StorageError(format!(
                "artifacts for '{key}' already stored"
            ))),
            Entry::Vacant(slot) => {
                let mut bundle = Bundle::new();
                read_bundle(artifacts, artifacts, &mut bundle)?;
                std::fs::remove_dir_all(artifacts)?;
                slot.insert(bundle);
                Ok(())
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.store.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.store.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
