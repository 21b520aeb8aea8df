//! Quadratic drag polar
//!
//! Maps a lift-type coefficient onto the drag coefficient the car pays for it:
//!
//! ```text
//! cd = -(k * (cl - cl0)^2 + cd0)
//! ```
//!
//! Downforce is negative lift (`cl = -cdf`). Inputs must be finite; NaN and
//! infinities propagate through the arithmetic unchecked.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Zero-aero lift coefficient.
pub const DEFAULT_LIFT0: f64 = 0.01;

/// Zero-aero drag coefficient.
pub const DEFAULT_DRAG0: f64 = 0.6;

/// Polar curvature (induced drag factor).
pub const DEFAULT_K: f64 = 0.04;

/// A candidate coefficient, given either as lift or as downforce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coefficient {
    /// Lift coefficient `cl`
    Lift(f64),
    /// Downforce coefficient `cdf = -cl`
    Downforce(f64),
}

impl Coefficient {
    /// Build from a pair of optional inputs, exactly one of which must be set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if neither or both are supplied.
    pub fn from_options(downforce: Option<f64>, lift: Option<f64>) -> Result<Self> {
        match (downforce, lift) {
            (Some(cdf), None) => Ok(Self::Downforce(cdf)),
            (None, Some(cl)) => Ok(Self::Lift(cl)),
            (None, None) => Err(Error::InvalidInput(
                "must pass a downforce or a lift coefficient".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::InvalidInput(
                "cannot pass both downforce and lift coefficients, pass one or the other"
                    .to_string(),
            )),
        }
    }

    /// The lift-type value of this coefficient.
    #[must_use]
    pub fn lift(self) -> f64 {
        match self {
            Self::Lift(cl) => cl,
            Self::Downforce(cdf) => -cdf,
        }
    }
}

/// Parameters of the quadratic drag polar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarModel {
    /// Lift coefficient at which drag is minimal
    pub lift0: f64,
    /// Drag coefficient with no aero load
    pub drag0: f64,
    /// Polar curvature
    pub k: f64,
}

impl Default for PolarModel {
    fn default() -> Self {
        Self::new(DEFAULT_LIFT0, DEFAULT_DRAG0, DEFAULT_K)
    }
}

impl PolarModel {
    /// Create a polar with explicit parameters.
    #[must_use]
    pub const fn new(lift0: f64, drag0: f64, k: f64) -> Self {
        Self { lift0, drag0, k }
    }

    /// Drag coefficient for a lift coefficient.
    #[must_use]
    pub fn drag(&self, lift: f64) -> f64 {
        let offset = lift - self.lift0;
        -(self.k * offset * offset + self.drag0)
    }

    /// Drag coefficient for either form of coefficient.
    #[must_use]
    pub fn drag_for(&self, coefficient: Coefficient) -> f64 {
        self.drag(coefficient.lift())
    }
}

/// Drag coefficient from exactly one of `downforce` or `lift`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if neither or both are supplied.
///
/// # Example
///
/// ```rust
/// use downforce::aero::{drag_from_downforce_or_lift, PolarModel};
///
/// let model = PolarModel::default();
/// let by_lift = drag_from_downforce_or_lift(None, Some(-3.0), &model)?;
/// let by_downforce = drag_from_downforce_or_lift(Some(3.0), None, &model)?;
/// assert_eq!(by_lift, by_downforce);
/// # Ok::<(), downforce::Error>(())
/// ```
pub fn drag_from_downforce_or_lift(
    downforce: Option<f64>,
    lift: Option<f64>,
    model: &PolarModel,
) -> Result<f64> {
    let coefficient = Coefficient::from_options(downforce, lift)?;
    let drag = model.drag_for(coefficient);
    tracing::trace!(?coefficient, ?model, drag, "drag from polar");
    Ok(drag)
}
