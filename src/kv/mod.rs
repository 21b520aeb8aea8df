//! Artifact Store - cache of simulator output keyed by candidate
//!
//! Each key names one evaluated candidate (see
//! [`CoefficientPair::cache_key`](crate::record::CoefficientPair::cache_key)),
//! and its value is the bundle of files the simulator produced for it.
//! The runner only ever asks whether a key is present, reads one file out of
//! a bundle, or hands over a fresh output directory, so the backing storage
//! can change without the search noticing.
//!
//! # Example
//!
//! ```rust,no_run
//! use downforce::kv::{ArtifactStore, FsArtifactStore};
//! use std::path::Path;
//!
//! # fn example() -> downforce::Result<()> {
//! let store = FsArtifactStore::new("results/OPTIMISE_run");
//!
//! if !store.contains("-4~-1.2432")? {
//!     store.put("-4~-1.2432", Path::new("libs/openlap/OpenLap Sims"))?;
//! }
//! let table = store.get("-4~-1.2432", "OpenLAP_sim.csv")?;
//! # Ok(())
//! # }
//! ```

mod fs;
mod memory;

pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use std::path::Path;

use crate::{Error, Result};

/// Store of simulator artifact bundles.
///
/// Implementations assume a single owner: concurrent writers to the same
/// store are not coordinated.
pub trait ArtifactStore {
    /// Check if a bundle exists for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be queried.
    fn contains(&self, key: &str) -> Result<bool>;

    /// Read `file` from the bundle stored under `key`.
    ///
    /// Returns `None` if the key or the file within it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str, file: &str) -> Result<Option<Vec<u8>>>;

    /// Take ownership of the directory `artifacts` as the bundle for `key`.
    ///
    /// The source directory no longer exists afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is already present or the directory cannot
    /// be moved.
    fn put(&self, key: &str, artifacts: &Path) -> Result<()>;

    /// Delete the bundle for `key`.
    ///
    /// No-op if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn delete(&self, key: &str) -> Result<()>;

    /// All stored keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be listed.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reject keys that would escape the store when used as a path segment.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!("invalid artifact key '{key}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn artifacts(scratch: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let dir = scratch.path().join(name);
        fs::create_dir_all(dir.join("plots")).unwrap();
        fs::write(dir.join("OpenLAP_sim.csv"), content).unwrap();
        fs::write(dir.join("plots").join("speed.txt"), "trace").unwrap();
        dir
    }

    fn exercise(store: &impl ArtifactStore, scratch: &TempDir) {
        assert!(!store.contains("-1~-0.64").unwrap());
        assert_eq!(store.get("-1~-0.64", "OpenLAP_sim.csv").unwrap(), None);

        let dir = artifacts(scratch, "out1", "lap");
        store.put("-1~-0.64", &dir).unwrap();
        assert!(!dir.exists());
        assert!(store.contains("-1~-0.64").unwrap());
        assert_eq!(
            store.get("-1~-0.64", "OpenLAP_sim.csv").unwrap(),
            Some(b"lap".to_vec())
        );
        assert_eq!(store.get("-1~-0.64", "missing.csv").unwrap(), None);

        let dir = artifacts(scratch, "out2", "other");
        store.put("-2~-0.78", &dir).unwrap();
        assert_eq!(
            store.keys().unwrap(),
            vec!["-1~-0.64".to_string(), "-2~-0.78".to_string()]
        );

        let dir = artifacts(scratch, "out3", "again");
        assert!(store.put("-1~-0.64", &dir).is_err());

        store.delete("-1~-0.64").unwrap();
        assert!(!store.contains("-1~-0.64").unwrap());
        store.delete("-1~-0.64").unwrap();
    }

    #[test]
    fn test_memory_store_behaviour() {
        let scratch = TempDir::new().unwrap();
        exercise(&MemoryArtifactStore::new(), &scratch);
    }

    #[test]
    fn test_fs_store_behaviour() {
        let scratch = TempDir::new().unwrap();
        let store = FsArtifactStore::new(scratch.path().join("session"));
        exercise(&store, &scratch);
    }

    #[test]
    fn test_nested_files_are_kept() {
        let scratch = TempDir::new().unwrap();
        let store = MemoryArtifactStore::new();
        let dir = artifacts(&scratch, "out", "lap");
        store.put("k", &dir).unwrap();
        assert_eq!(
            store.get("k", "plots/speed.txt").unwrap(),
            Some(b"trace".to_vec())
        );
    }

    #[test]
    fn test_put_missing_directory_fails() {
        let scratch = TempDir::new().unwrap();
        let missing = scratch.path().join("never-written");
        let memory = MemoryArtifactStore::new();
        assert!(matches!(
            memory.put("k", &missing),
            Err(Error::StorageError(_))
        ));
        let fs_store = FsArtifactStore::new(scratch.path().join("session"));
        assert!(matches!(
            fs_store.put("k", &missing),
            Err(Error::StorageError(_))
        ));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        for key in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(validate_key(key), Err(Error::InvalidInput(_))),
                "{key:?}"
            );
        }
        assert!(validate_key("-4~-1.2432").is_ok());
    }

    fn rejects_bad_keys(store: &impl ArtifactStore) {
        for key in ["", "..", "a/b"] {
            assert!(matches!(store.contains(key), Err(Error::InvalidInput(_))), "{key:?}");
            assert!(
                matches!(store.get(key, "OpenLAP_sim.csv"), Err(Error::InvalidInput(_))),
                "{key:?}"
            );
            assert!(matches!(store.delete(key), Err(Error::InvalidInput(_))), "{key:?}");
        }
    }

    #[test]
    fn test_backends_agree_on_invalid_keys() {
        let scratch = TempDir::new().unwrap();
        rejects_bad_keys(&MemoryArtifactStore::new());
        rejects_bad_keys(&FsArtifactStore::new(scratch.path().join("session")));
    }
}
