//! Session Record - manifest of one search session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionKind;
use crate::record::SimulationResult;

/// Status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Session is evaluating candidates.
    Running,
    /// Search finished and produced a result.
    Success,
    /// Search aborted with an error.
    Failed,
}

/// Manifest written alongside a session's artifacts.
///
/// A session can be reopened any number of times; each reopening moves it
/// back to `Running` while keeping its original creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    name: String,
    kind: SessionKind,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    resumed_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    best: Option<SimulationResult>,
}

impl SessionRecord {
    /// Create a record in Running status, created now.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            status: SessionStatus::Running,
            created_at: Utc::now(),
            resumed_at: None,
            ended_at: None,
            best: None,
        }
    }

    /// Get the session name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the kind of search the session was created for.
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the time of the latest reopening, if any.
    #[must_use]
    pub const fn resumed_at(&self) -> Option<DateTime<Utc>> {
        self.resumed_at
    }

    /// Get the end timestamp, if the session has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Get the best result recorded at completion.
    #[must_use]
    pub const fn best(&self) -> Option<&SimulationResult> {
        self.best.as_ref()
    }

    /// Reopen the session, transitioning back to Running.
    pub fn resume(&mut self) {
        self.status = SessionStatus::Running;
        self.resumed_at = Some(Utc::now());
        self.ended_at = None;
    }

    /// Complete the session with the given final status.
    ///
    /// Sets the `ended_at` timestamp to now.
    pub fn complete(&mut self, status: SessionStatus, best: Option<SimulationResult>) {
        self.status = status;
        self.best = best;
        self.ended_at = Some(Utc::now());
    }
}
