//! Search sessions
//!
//! A session is a named directory under the results root that outlives the
//! process. It holds one artifact bundle per evaluated candidate, optionally
//! one CSV per sampling pass, and a `session.json` manifest:
//!
//! ```text
//! results/OPTIMISE_05_May_22_14h_03m/
//!     session.json
//!     -1~-0.640804/OpenLAP_sim.csv
//!     -4~-1.2432/OpenLAP_sim.csv
//!     pass_0.csv
//! ```
//!
//! Reopening an existing session is normal: candidates already in its store
//! are not simulated again. Only one search may use a session at a time.

mod record;

pub use record::{SessionRecord, SessionStatus};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::kv::{ArtifactStore, FsArtifactStore};
use crate::record::{ResultTable, SimulationResult};
use crate::{Error, Result};

/// Manifest file name within a session directory.
pub const MANIFEST_FILE: &str = "session.json";

/// Timestamp layout of generated session names.
pub const SESSION_TIME_FORMAT: &str = "%d_%b_%y_%Hh_%Mm";

/// Timestamp layout of generated sweep table names.
pub const SWEEP_TIME_FORMAT: &str = "%d_%b_%y_%Hh_%Mm_%Ss";

/// Table name for a sweep started at `at`, e.g. `sweep_05_May_22_14h_03m_09s`.
#[must_use]
pub fn sweep_pass_name(at: DateTime<Local>) -> String {
    format!("sweep_{}", at.format(SWEEP_TIME_FORMAT))
}

/// What a session was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    /// A single sweep over a range
    Range,
    /// An iterative optimisation
    Optimise,
}

impl SessionKind {
    /// Upper-case prefix used in generated names.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Range => "RANGE",
            Self::Optimise => "OPTIMISE",
        }
    }

    /// Session name for a search started at `at`, e.g. `OPTIMISE_05_May_22_14h_03m`.
    #[must_use]
    pub fn name_at(&self, at: DateTime<Local>) -> String {
        format!("{}_{}", self.prefix(), at.format(SESSION_TIME_FORMAT))
    }

    /// Session name for a search started now.
    #[must_use]
    pub fn default_name(&self) -> String {
        self.name_at(Local::now())
    }
}

/// An open session: its directory, manifest and artifact store.
#[derive(Debug)]
pub struct SearchSession<S = FsArtifactStore> {
    dir: PathBuf,
    record: SessionRecord,
    store: S,
}

impl SearchSession<FsArtifactStore> {
    /// Open (or create) `results_dir/name` with a filesystem store.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or manifest cannot be written.
    pub fn open(results_dir: &Path, name: &str, kind: SessionKind) -> Result<Self> {
        let dir = results_dir.join(name);
        Self::with_store(results_dir, name, kind, FsArtifactStore::new(dir))
    }
}

impl<S: ArtifactStore> SearchSession<S> {
    /// Open (or create) `results_dir/name`, caching artifacts in `store`.
    ///
    /// An existing directory is reused; its manifest is resumed when it can
    /// be read, and replaced otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unusable name, or an error if the
    /// directory or manifest cannot be written.
    pub fn with_store(results_dir: &Path, name: &str, kind: SessionKind, store: S) -> Result<Self> {
        crate::kv::validate_key(name)
            .map_err(|_| Error::InvalidInput(format!("invalid session name '{name}'")))?;
        let dir = results_dir.join(name);

        let record = if dir.is_dir() {
            tracing::warn!(session = name, "session directory already exists, continuing");
            match Self::read_manifest(&dir) {
                Some(mut record) => {
                    record.resume();
                    record
                }
                None => SessionRecord::new(name, kind),
            }
        } else {
            std::fs::create_dir_all(&dir)?;
            tracing::info!(session = name, dir = %dir.display(), "session directory created");
            SessionRecord::new(name, kind)
        };

        let session = Self { dir, record, store };
        session.write_manifest()?;
        Ok(session)
    }

    fn read_manifest(dir: &Path) -> Option<SessionRecord> {
        let text = std::fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable session manifest, starting a new one");
                None
            }
        }
    }

    fn write_manifest(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.record)?;
        std::fs::write(self.dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    /// Get the session name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.record.name()
    }

    /// Get the session directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the session manifest.
    #[must_use]
    pub const fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// Get the artifact store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Path a pass named `pass` is persisted at.
    #[must_use]
    pub fn table_path(&self, pass: &str) -> PathBuf {
        self.dir.join(format!("{pass}.csv"))
    }

    /// `base`, or `base_2`, `base_3`, ... if a table by that name is already saved.
    #[must_use]
    pub fn fresh_pass_name(&self, base: &str) -> String {
        if !self.table_path(base).exists() {
            return base.to_string();
        }
        (2..)
            .map(|i: usize| format!("{base}_{i}"))
            .find(|name| !self.table_path(name).exists())
            .unwrap_or_else(|| base.to_string())
    }

    /// Persist a pass's table as `<pass>.csv`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist_table(&self, pass: &str, table: &ResultTable) -> Result<PathBuf> {
        crate::kv::validate_key(pass)
            .map_err(|_| Error::InvalidInput(format!("invalid pass name '{pass}'")))?;
        let path = self.table_path(pass);
        if path.exists() {
            tracing::warn!(path = %path.display(), "replacing saved result table");
        }
        table.write_csv(&path)?;
        tracing::debug!(path = %path.display(), rows = table.len(), "result table saved");
        Ok(path)
    }

    /// Read a previously persisted pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn read_table(&self, pass: &str) -> Result<ResultTable> {
        ResultTable::read_csv(self.table_path(pass))
    }

    /// Record the outcome of the search in the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn complete(&mut self, status: SessionStatus, best: Option<SimulationResult>) -> Result<()> {
        self.record.complete(status, best);
        self.write_manifest()
    }
}
