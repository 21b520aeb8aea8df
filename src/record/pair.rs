//! Coefficient Pair - one candidate lift/drag combination

use serde::{Deserialize, Serialize};

use crate::aero::{round_sigfigs, PolarModel};

/// A candidate lift coefficient with the drag it implies.
///
/// The drag is always derived from the lift through a [`PolarModel`]; there
/// is no constructor that takes it independently. Both fields are rounded to
/// a fixed number of significant figures so the pair is stable as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientPair {
    lift: f64,
    drag: f64,
}

impl CoefficientPair {
    /// Derive the pair for `lift` and round both fields to `sigfigs`.
    #[must_use]
    pub fn derive(lift: f64, model: &PolarModel, sigfigs: usize) -> Self {
        let drag = model.drag(lift);
        Self {
            lift: round_sigfigs(lift, sigfigs),
            drag: round_sigfigs(drag, sigfigs),
        }
    }

    /// Get the lift coefficient.
    #[must_use]
    pub const fn lift(&self) -> f64 {
        self.lift
    }

    /// Get the downforce coefficient (`-lift`).
    #[must_use]
    pub fn downforce(&self) -> f64 {
        0.0 - self.lift
    }

    /// Get the drag coefficient as produced by the polar (negative).
    #[must_use]
    pub const fn drag(&self) -> f64 {
        self.drag
    }

    /// Key under which this candidate's simulator artifacts are stored.
    ///
    /// Format: `<cl>~<cd>`, e.g. `-4~-1.2432`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}~{}", self.lift, self.drag)
    }
}
