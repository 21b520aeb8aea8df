//! Search Interval - the lift range one optimiser pass samples

use serde::{Deserialize, Serialize};

/// Bounds on the lift coefficient for one sampling pass.
///
/// The bounds keep the order they were given in, since that order is the
/// direction the sampler walks. Intervals are values: each optimiser pass
/// builds a new one rather than editing the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchInterval {
    start: f64,
    end: f64,
}

impl SearchInterval {
    /// Create an interval from its two bounds.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Interval of half-width `half_width` around `center`, oriented like `self`.
    #[must_use]
    pub fn around(&self, center: f64, half_width: f64) -> Self {
        let half_width = half_width.abs();
        if self.start <= self.end {
            Self::new(center - half_width, center + half_width)
        } else {
            Self::new(center + half_width, center - half_width)
        }
    }

    /// First bound.
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Second bound.
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Bounds as an array, in sampling order.
    #[must_use]
    pub const fn bounds(&self) -> [f64; 2] {
        [self.start, self.end]
    }

    /// Absolute width.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.end - self.start).abs()
    }
}

impl From<[f64; 2]> for SearchInterval {
    fn from([start, end]: [f64; 2]) -> Self {
        Self::new(start, end)
    }
}

impl std::fmt::Display for SearchInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds_keep_order() {
        let interval = SearchInterval::from([-1.0, -10.0]);
        assert_eq!(interval.bounds(), [-1.0, -10.0]);
        assert!((interval.width() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_around_follows_orientation() {
        let descending = SearchInterval::new(-1.0, -10.0);
        assert_eq!(descending.around(-1.0, 3.0).bounds(), [2.0, -4.0]);

        let ascending = SearchInterval::new(1.0, 10.0);
        assert_eq!(ascending.around(10.0, -3.0).bounds(), [7.0, 13.0]);
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(SearchInterval::new(-2.5, -4.0).to_string(), "[-2.5, -4]");
    }
}
