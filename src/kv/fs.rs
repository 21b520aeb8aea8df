//! Filesystem artifact store: one subdirectory per key under a session root.
//!
//! ```text
//! results/<session>/
//!     -1~-0.640804/OpenLAP_sim.csv
//!     -4~-1.2432/OpenLAP_sim.csv
//! ```

use std::path::{Path, PathBuf};

use super::{validate_key, ArtifactStore};
use crate::{Error, Result};

/// Artifact store backed by a session directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Store rooted at `root`. The directory is created on first `put`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the bundle for `key`.
    #[must_use]
    pub fn bundle_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

/// Move `from` to `to`, copying when a rename can't cross filesystems.
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_dir(from, to)?;
    std::fs::remove_dir_all(from)?;
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

impl ArtifactStore for FsArtifactStore {
    fn contains(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.bundle_dir(key).is_dir())
    }

    fn get(&self, key: &str, file: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let path = self.bundle_dir(key).join(file);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, artifacts: &Path) -> Result<()> {
        validate_key(key)?;
        if !artifacts.is_dir() {
            return Err(Error::StorageError(format!(
                "artifact directory {} does not exist",
                artifacts.display()
            )));
        }
        let target = self.bundle_dir(key);
        if target.exists() {
            return Err(Error::StorageError(format!(
                "artifacts for '{key}' already stored at {}",
                target.display()
            )));
        }
        std::fs::create_dir_all(&self.root)?;
        relocate(artifacts, &target)?;
        tracing::debug!(from = %artifacts.display(), to = %target.display(), "artifacts relocated");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        match std::fs::remove_dir_all(self.bundle_dir(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_of_missing_root() {
        let scratch = tempfile::TempDir::new().unwrap();
        let store = FsArtifactStore::new(scratch.path().join("absent"));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_keys_ignore_files() {
        let scratch = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(scratch.path().join("-1~-0.6")).unwrap();
        std::fs::write(scratch.path().join("pass_0.csv"), ",time,cl,cdf,cd\n").unwrap();
        let store = FsArtifactStore::new(scratch.path());
        assert_eq!(store.keys().unwrap(), vec!["-1~-0.6".to_string()]);
    }

    #[test]
    fn test_copy_fallback_preserves_tree() {
        let scratch = tempfile::TempDir::new().unwrap();
        let from = scratch.path().join("from");
        std::fs::create_dir_all(from.join("nested")).unwrap();
        std::fs::write(from.join("nested").join("f.txt"), "x").unwrap();
        let to = scratch.path().join("to");
        copy_dir(&from, &to).unwrap();
        assert_eq!(std::fs::read(to.join("nested").join("f.txt")).unwrap(), b"x");
    }
}
