//! Simulation Result - lap time for one evaluated candidate

use serde::{Deserialize, Serialize};

use super::CoefficientPair;

/// Outcome of simulating one candidate pair.
///
/// Drag is reported positive: the polar produces a negative drag value and
/// the result stores its negation. Downforce is always `-lift`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    lap_time: f64,
    lift_coefficient: f64,
    downforce_coefficient: f64,
    drag_coefficient: f64,
}

impl SimulationResult {
    /// Create a result for `pair` with an already rounded lap time.
    #[must_use]
    pub fn new(lap_time: f64, pair: &CoefficientPair) -> Self {
        Self {
            lap_time,
            lift_coefficient: pair.lift(),
            downforce_coefficient: pair.downforce(),
            drag_coefficient: -pair.drag(),
        }
    }

    /// Rebuild a result from its stored columns.
    #[must_use]
    pub const fn from_columns(lap_time: f64, lift: f64, downforce: f64, drag: f64) -> Self {
        Self {
            lap_time,
            lift_coefficient: lift,
            downforce_coefficient: downforce,
            drag_coefficient: drag,
        }
    }

    /// Get the simulated lap time.
    #[must_use]
    pub const fn lap_time(&self) -> f64 {
        self.lap_time
    }

    /// Get the lift coefficient.
    #[must_use]
    pub const fn lift_coefficient(&self) -> f64 {
        self.lift_coefficient
    }

    /// Get the downforce coefficient.
    #[must_use]
    pub const fn downforce_coefficient(&self) -> f64 {
        self.downforce_coefficient
    }

    /// Get the drag coefficient (positive).
    #[must_use]
    pub const fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }
}

impl std::fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time={} cl={} cdf={} cd={}",
            self.lap_time, self.lift_coefficient, self.downforce_coefficient, self.drag_coefficient
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::PolarModel;

    #[test]
    fn test_result_sign_conventions() {
        let pair = CoefficientPair::derive(-2.0, &PolarModel::default(), 6);
        let result = SimulationResult::new(81.5, &pair);
        assert_eq!(result.lap_time(), 81.5);
        assert_eq!(result.lift_coefficient(), -2.0);
        assert_eq!(result.downforce_coefficient(), 2.0);
        assert_eq!(result.drag_coefficient(), -pair.drag());
        assert!(result.drag_coefficient() > 0.0);
    }

    #[test]
    fn test_result_display() {
        let result = SimulationResult::from_columns(80.0, -1.0, 1.0, 0.64);
        assert_eq!(result.to_string(), "time=80 cl=-1 cdf=1 cd=0.64");
    }
}
