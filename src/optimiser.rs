//! Range optimiser: narrow a lift range towards the fastest lap
//!
//! Each pass samples the current interval, finds the fastest sample, and
//! makes the interval between that sample's two neighbours the next one:
//!
//! ```text
//! pass 0:  -1 ─────── -4 ─────── -7 ─────── -10      best at -4
//! pass 1:  -1 ── -3 ── -5 ── -7                      best at -3
//! pass 2:       -1 ─ ... ─ -5
//! ```
//!
//! The number of passes is fixed; there is no convergence tolerance. A best
//! sample on either end of the interval has only one neighbour, which is
//! handled by the [`BoundaryPolicy`].

use serde::{Deserialize, Serialize};

use crate::aero::{sample_pairs, PolarModel, SampleRange, DEFAULT_SIGFIGS};
use crate::external::{LapSimulator, VehicleConfigStore};
use crate::kv::ArtifactStore;
use crate::record::{ResultTable, SearchInterval, SimulationResult};
use crate::runner::SimulationRunner;
use crate::session::{SearchSession, SessionStatus};
use crate::{Error, Result};

/// Response to a pass whose best sample is the first or last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Stop with [`Error::SearchDivergence`]
    #[default]
    Fail,
    /// Centre the next interval on the boundary sample, one sample spacing
    /// either side, so the search moves past the old boundary
    Extend,
}

/// What one optimiser pass found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    /// Interval the pass sampled
    pub interval: SearchInterval,
    /// Sample position of the fastest lap
    pub best_index: usize,
    /// Fastest result of the pass
    pub best: SimulationResult,
    /// Interval derived for the following pass
    pub next_interval: SearchInterval,
}

/// Result of an optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    best: SimulationResult,
    passes: Vec<PassSummary>,
}

impl Optimum {
    /// Best result of the final pass.
    #[must_use]
    pub const fn best(&self) -> &SimulationResult {
        &self.best
    }

    /// Per-pass history, in order.
    #[must_use]
    pub fn passes(&self) -> &[PassSummary] {
        &self.passes
    }
}

/// Iterative range-narrowing search over the lift coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOptimiser {
    model: PolarModel,
    sigfigs: usize,
    boundary: BoundaryPolicy,
    persist_passes: bool,
}

impl Default for RangeOptimiser {
    fn default() -> Self {
        Self::new(PolarModel::default())
    }
}

impl RangeOptimiser {
    /// Optimiser deriving drag through `model`.
    #[must_use]
    pub const fn new(model: PolarModel) -> Self {
        Self {
            model,
            sigfigs: DEFAULT_SIGFIGS,
            boundary: BoundaryPolicy::Fail,
            persist_passes: false,
        }
    }

    /// Set the significant figures used for candidate keys.
    #[must_use]
    pub const fn sigfigs(mut self, sigfigs: usize) -> Self {
        self.sigfigs = sigfigs;
        self
    }

    /// Set the boundary policy.
    #[must_use]
    pub const fn boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Save each optimisation pass as `pass_<i>.csv` in the session.
    #[must_use]
    pub const fn persist_passes(mut self, persist: bool) -> Self {
        self.persist_passes = persist;
        self
    }

    /// Run one sampling pass of `n` candidates over `range`.
    ///
    /// When `persist` names a pass, the table is also written to the session
    /// as `<persist>.csv`.
    ///
    /// # Errors
    ///
    /// Propagates the first candidate failure; no further candidates are
    /// evaluated after it.
    pub fn simulate_range<S, C, L>(
        &self,
        runner: &mut SimulationRunner<C, L>,
        session: &SearchSession<S>,
        range: SampleRange,
        n: usize,
        persist: Option<&str>,
    ) -> Result<ResultTable>
    where
        S: ArtifactStore,
        C: VehicleConfigStore,
        L: LapSimulator,
    {
        let [start, end] = range.lift_bounds();
        let _span = tracing::info_span!("sweep", session = session.name(), start, end, n).entered();

        let mut table = ResultTable::with_capacity(n);
        for (i, pair) in sample_pairs(range, n, self.model)
            .sigfigs(self.sigfigs)
            .enumerate()
        {
            tracing::debug!(i, cl = pair.lift(), cd = pair.drag(), "starting simulation");
            table.push(runner.evaluate(session.store(), &pair)?);
        }

        if let Some(pass) = persist {
            session.persist_table(pass, &table)?;
        }
        Ok(table)
    }

    /// Search for the lift coefficient with the fastest lap.
    ///
    /// Runs exactly `iterations` passes of `sampler_n` samples, starting from
    /// `starting_range`, and returns the best result of the last pass. The
    /// session manifest is marked `Success` or `Failed` on the way out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `iterations` is zero, `sampler_n` is
    /// below 3 or a bound is not finite; [`Error::SearchDivergence`] under
    /// [`BoundaryPolicy::Fail`] when a pass is won by a boundary sample; and
    /// any candidate failure unchanged. If the search succeeds but the
    /// manifest cannot be written, that write error is returned instead of
    /// the optimum. After a failed search the search error is kept and a
    /// manifest write error is only logged.
    pub fn optimise<S, C, L>(
        &self,
        runner: &mut SimulationRunner<C, L>,
        session: &mut SearchSession<S>,
        iterations: usize,
        starting_range: SearchInterval,
        sampler_n: usize,
    ) -> Result<Optimum>
    where
        S: ArtifactStore,
        C: VehicleConfigStore,
        L: LapSimulator,
    {
        let outcome = self.run_passes(runner, session, iterations, starting_range, sampler_n);
        let (status, best) = match &outcome {
            Ok(optimum) => (SessionStatus::Success, Some(optimum.best)),
            Err(_) => (SessionStatus::Failed, None),
        };
        match (session.complete(status, best), outcome) {
            (Ok(()), outcome) => outcome,
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(search)) => {
                tracing::warn!(error = %e, "could not update session manifest");
                Err(search)
            }
        }
    }

    fn run_passes<S, C, L>(
        &self,
        runner: &mut SimulationRunner<C, L>,
        session: &SearchSession<S>,
        iterations: usize,
        starting_range: SearchInterval,
        sampler_n: usize,
    ) -> Result<Optimum>
    where
        S: ArtifactStore,
        C: VehicleConfigStore,
        L: LapSimulator,
    {
        if iterations == 0 {
            return Err(Error::InvalidInput("iterations must be at least 1".to_string()));
        }
        if sampler_n < 3 {
            return Err(Error::InvalidInput(format!(
                "need at least 3 samples per pass to narrow around the best, got {sampler_n}"
            )));
        }
        if !starting_range.start().is_finite() || !starting_range.end().is_finite() {
            return Err(Error::InvalidInput(format!(
                "starting range {starting_range} must be finite"
            )));
        }

        let _span = tracing::info_span!("optimise", session = session.name(), iterations).entered();
        let mut interval = starting_range;
        let mut passes = Vec::with_capacity(iterations);

        for i in 0..iterations {
            tracing::info!(i, %interval, "starting iteration");
            let pass_name = format!("pass_{i}");
            let table = self.simulate_range(
                runner,
                session,
                SampleRange::Lift(interval.bounds()),
                sampler_n,
                self.persist_passes.then_some(pass_name.as_str()),
            )?;

            let best_index = table.best_index().ok_or_else(|| {
                Error::SimulationFailure(format!("pass {i} produced no comparable lap times"))
            })?;
            let best = table.rows()[best_index];
            let next_interval = self.next_interval(&table, interval, best_index)?;
            tracing::debug!(i, best_index, lap_time = best.lap_time(), %next_interval, "pass complete");

            passes.push(PassSummary {
                interval,
                best_index,
                best,
                next_interval,
            });
            interval = next_interval;
        }

        let stats = runner.stats();
        tracing::info!(simulated = stats.simulated, reused = stats.reused, "optimise ran successfully");

        // iterations >= 1, so there is a last pass
        let best = passes
            .last()
            .map(|pass| pass.best)
            .ok_or_else(|| Error::Other("optimiser ran no passes".to_string()))?;
        Ok(Optimum { best, passes })
    }

    /// Interval for the pass after one won by sample `index`.
    fn next_interval(
        &self,
        table: &ResultTable,
        interval: SearchInterval,
        index: usize,
    ) -> Result<SearchInterval> {
        let rows = table.rows();
        let last = rows.len() - 1;
        if index > 0 && index < last {
            return Ok(SearchInterval::new(
                rows[index - 1].lift_coefficient(),
                rows[index + 1].lift_coefficient(),
            ));
        }

        match self.boundary {
            BoundaryPolicy::Fail => Err(Error::SearchDivergence {
                index,
                samples: rows.len(),
                start: interval.start(),
                end: interval.end(),
            }),
            BoundaryPolicy::Extend => {
                let spacing = (rows[1].lift_coefficient() - rows[0].lift_coefficient()).abs();
                let center = rows[index].lift_coefficient();
                tracing::warn!(index, center, spacing, "best sample on boundary, extending");
                Ok(interval.around(center, spacing))
            }
        }
    }
}
