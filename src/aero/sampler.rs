//! Evenly spaced candidate sampling
//!
//! A sweep over `[start, end]` with `n` points includes both endpoints, the
//! way a linear space does, and runs in the order the bounds are given: a
//! lift range of `[-1, -10]` is walked from `-1` down to `-10`.

use crate::record::CoefficientPair;
use crate::{Error, Result};

use super::polar::PolarModel;
use super::sigfig::DEFAULT_SIGFIGS;

/// Range to sweep, given either in lift or in downforce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleRange {
    /// Bounds on the lift coefficient
    Lift([f64; 2]),
    /// Bounds on the downforce coefficient
    Downforce([f64; 2]),
}

impl SampleRange {
    /// Build from a pair of optional ranges, exactly one of which must be set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if neither or both are supplied.
    pub fn from_options(
        lift_range: Option<[f64; 2]>,
        downforce_range: Option<[f64; 2]>,
    ) -> Result<Self> {
        match (lift_range, downforce_range) {
            (Some(range), None) => Ok(Self::Lift(range)),
            (None, Some(range)) => Ok(Self::Downforce(range)),
            (None, None) => Err(Error::InvalidInput(
                "must pass a lift range or a downforce range".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::InvalidInput(
                "cannot pass both a lift range and a downforce range, pass one or the other"
                    .to_string(),
            )),
        }
    }

    /// Bounds expressed on the lift coefficient.
    #[must_use]
    pub fn lift_bounds(self) -> [f64; 2] {
        match self {
            Self::Lift(range) => range,
            Self::Downforce([start, end]) => [-start, -end],
        }
    }
}

/// Lazy, restartable sequence of candidate pairs.
///
/// Cloning a sampler gives an independent cursor; [`PairSampler::restart`]
/// gives a fresh one positioned at the first candidate.
#[derive(Debug, Clone)]
pub struct PairSampler {
    start: f64,
    end: f64,
    n: usize,
    next: usize,
    model: PolarModel,
    sigfigs: usize,
}

impl PairSampler {
    /// Sampler over `[start, end]` on the lift coefficient with `n` points.
    #[must_use]
    pub const fn new(bounds: [f64; 2], n: usize, model: PolarModel) -> Self {
        Self {
            start: bounds[0],
            end: bounds[1],
            n,
            next: 0,
            model,
            sigfigs: DEFAULT_SIGFIGS,
        }
    }

    /// Set the significant figures every emitted value is rounded to.
    #[must_use]
    pub const fn sigfigs(mut self, sigfigs: usize) -> Self {
        self.sigfigs = sigfigs;
        self
    }

    /// A fresh sampler over the same range, positioned at the start.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self {
            next: 0,
            ..*self
        }
    }

    /// Total number of candidates in a full pass.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.n
    }

    /// Unrounded lift coefficient of sample `index`.
    #[allow(clippy::cast_precision_loss)]
    fn lift_at(&self, index: usize) -> f64 {
        if self.n == 1 || index == 0 {
            return self.start;
        }
        if index == self.n - 1 {
            return self.end;
        }
        let step = (self.end - self.start) / (self.n - 1) as f64;
        self.start + index as f64 * step
    }
}

impl Iterator for PairSampler {
    type Item = CoefficientPair;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.n {
            return None;
        }
        let lift = self.lift_at(self.next);
        self.next += 1;
        let pair = CoefficientPair::derive(lift, &self.model, self.sigfigs);
        tracing::trace!(lift = pair.lift(), drag = pair.drag(), "sampled pair");
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PairSampler {}

/// Sample `n` candidate pairs evenly across `range`.
///
/// # Example
///
/// ```rust
/// use downforce::aero::{sample_pairs, PolarModel, SampleRange};
///
/// let pairs: Vec<_> = sample_pairs(SampleRange::Lift([-1.0, -10.0]), 10, PolarModel::default())
///     .collect();
/// assert_eq!(pairs.len(), 10);
/// assert_eq!(pairs[0].lift(), -1.0);
/// assert_eq!(pairs[9].lift(), -10.0);
/// ```
#[must_use]
pub fn sample_pairs(range: SampleRange, n: usize, model: PolarModel) -> PairSampler {
    PairSampler::new(range.lift_bounds(), n, model)
}
