//! Simulation runner: evaluate one candidate, reusing cached artifacts
//!
//! For a candidate whose key is already in the store the simulator is not
//! touched at all. Otherwise the candidate goes through the full pipeline:
//!
//! ```text
//! vehicle config ─> build vehicle model ─> simulate lap ─> relocate output ─> parse lap time
//! ```
//!
//! Any failure along the way is returned as is. Nothing is retried.

use crate::external::{LapSimulator, LapTimeFormat, VehicleConfigStore};
use crate::kv::ArtifactStore;
use crate::record::{CoefficientPair, SimulationResult};
use crate::{Error, Result};

/// Counts of how candidates were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    /// Candidates that ran through the simulator
    pub simulated: usize,
    /// Candidates answered from the store
    pub reused: usize,
}

/// Drives the external simulator for one candidate at a time.
///
/// The runner borrows or owns the simulator it is given; pass `&mut sim` to
/// keep using the same simulator after the runner is dropped.
pub struct SimulationRunner<C, L> {
    vehicle: C,
    simulator: L,
    vehicle_template: String,
    format: LapTimeFormat,
    stats: RunnerStats,
}

impl<C: VehicleConfigStore, L: LapSimulator> SimulationRunner<C, L> {
    /// Create a runner writing candidates through `vehicle` into `vehicle_template`.
    #[must_use]
    pub fn new(vehicle: C, simulator: L, vehicle_template: impl Into<String>) -> Self {
        Self {
            vehicle,
            simulator,
            vehicle_template: vehicle_template.into(),
            format: LapTimeFormat::default(),
            stats: RunnerStats::default(),
        }
    }

    /// Use a custom lap-time table layout.
    #[must_use]
    pub fn with_format(mut self, format: LapTimeFormat) -> Self {
        self.format = format;
        self
    }

    /// Counts of simulated and reused candidates so far.
    #[must_use]
    pub const fn stats(&self) -> RunnerStats {
        self.stats
    }

    /// Template the candidates are written into.
    #[must_use]
    pub fn vehicle_template(&self) -> &str {
        &self.vehicle_template
    }

    /// Evaluate `pair`, simulating it only if `store` has no artifacts for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if the vehicle configuration cannot be
    /// written, [`Error::SimulationFailure`] if the simulator fails or leaves
    /// no lap-time table, and store errors as they occur.
    pub fn evaluate<S: ArtifactStore>(
        &mut self,
        store: &S,
        pair: &CoefficientPair,
    ) -> Result<SimulationResult> {
        let key = pair.cache_key();
        let _span = tracing::debug_span!("evaluate", %key).entered();

        if store.contains(&key)? {
            tracing::info!(%key, "already simulated, skipping this sim");
            self.stats.reused += 1;
        } else {
            self.simulate_into(store, &key, pair)?;
            self.stats.simulated += 1;
        }

        let artifact = self.simulator.artifact_name();
        let bytes = store.get(&key, artifact)?.ok_or_else(|| {
            Error::SimulationFailure(format!("no '{artifact}' stored for candidate {key}"))
        })?;
        let lap_time = self.format.parse(&bytes)?;
        tracing::debug!(%key, lap_time, "read final lap time");

        Ok(SimulationResult::new(lap_time, pair))
    }

    fn simulate_into<S: ArtifactStore>(
        &mut self,
        store: &S,
        key: &str,
        pair: &CoefficientPair,
    ) -> Result<()> {
        let output = self.simulator.output_dir();
        if output.exists() {
            tracing::warn!(dir = %output.display(), "removing stale simulator output");
            std::fs::remove_dir_all(&output)?;
        }

        self.vehicle.write(pair, &self.vehicle_template)?;
        self.simulator.build_vehicle_model()?;
        tracing::debug!("vehicle model built");
        self.simulator.simulate_lap()?;
        tracing::debug!("lap simulated");

        if !output.is_dir() {
            return Err(Error::SimulationFailure(format!(
                "simulator left no output at {}",
                output.display()
            )));
        }
        store.put(key, &output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::PolarModel;
    use crate::kv::MemoryArtifactStore;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingConfig {
        written: RefCell<Vec<CoefficientPair>>,
        fail: bool,
    }

    impl VehicleConfigStore for RecordingConfig {
        fn write(&self, pair: &CoefficientPair, _template: &str) -> Result<()> {
            if self.fail {
                return Err(Error::ConfigWrite("read-only".to_string()));
            }
            self.written.borrow_mut().push(*pair);
            Ok(())
        }
    }

    struct FixedSim {
        dir: TempDir,
        lap_time: &'static str,
        runs: usize,
        write_output: bool,
    }

    impl FixedSim {
        fn new(lap_time: &'static str) -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                lap_time,
                runs: 0,
                write_output: true,
            }
        }
    }

    impl LapSimulator for FixedSim {
        fn build_vehicle_model(&mut self) -> Result<()> {
            Ok(())
        }

        fn simulate_lap(&mut self) -> Result<()> {
            self.runs += 1;
            if self.write_output {
                let out = self.output_dir();
                std::fs::create_dir_all(&out)?;
                std::fs::write(
                    out.join("lap.csv"),
                    format!("time\n[s]\n0\n{}\n", self.lap_time),
                )?;
            }
            Ok(())
        }

        fn output_dir(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        fn artifact_name(&self) -> &str {
            "lap.csv"
        }
    }

    fn pair() -> CoefficientPair {
        CoefficientPair::derive(-3.0, &PolarModel::default(), 6)
    }

    #[test]
    fn test_evaluate_simulates_then_reuses() {
        let store = MemoryArtifactStore::new();
        let mut sim = FixedSim::new("84.1234567");
        let config = RecordingConfig::default();
        let mut runner = SimulationRunner::new(&config, &mut sim, "car.csv")
            .with_format(LapTimeFormat::new(0, "time"));

        let first = runner.evaluate(&store, &pair()).unwrap();
        let second = runner.evaluate(&store, &pair()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.lap_time(), 84.1235);
        assert_eq!(
            runner.stats(),
            RunnerStats {
                simulated: 1,
                reused: 1
            }
        );
        drop(runner);
        assert_eq!(sim.runs, 1);
        assert_eq!(config.written.borrow().as_slice(), &[pair()]);
    }

    #[test]
    fn test_missing_output_is_simulation_failure() {
        let store = MemoryArtifactStore::new();
        let mut sim = FixedSim::new("80");
        sim.write_output = false;
        let mut runner = SimulationRunner::new(RecordingConfig::default(), &mut sim, "car.csv");

        let err = runner.evaluate(&store, &pair()).unwrap_err();
        assert!(matches!(err, Error::SimulationFailure(_)));
        assert!(!store.contains(&pair().cache_key()).unwrap());
    }

    #[test]
    fn test_config_failure_stops_before_simulation() {
        let store = MemoryArtifactStore::new();
        let mut sim = FixedSim::new("80");
        let config = RecordingConfig {
            fail: true,
            ..RecordingConfig::default()
        };
        let mut runner = SimulationRunner::new(&config, &mut sim, "car.csv");

        let err = runner.evaluate(&store, &pair()).unwrap_err();
        assert!(matches!(err, Error::ConfigWrite(_)));
        drop(runner);
        assert_eq!(sim.runs, 0);
    }

    #[test]
    fn test_stale_output_is_cleared() {
        let store = MemoryArtifactStore::new();
        let mut sim = FixedSim::new("80");
        let stale = sim.output_dir();
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("leftover.txt"), "old").unwrap();
        let mut runner = SimulationRunner::new(RecordingConfig::default(), &mut sim, "car.csv")
            .with_format(LapTimeFormat::new(0, "time"));

        runner.evaluate(&store, &pair()).unwrap();
        assert_eq!(store.get(&pair().cache_key(), "leftover.txt").unwrap(), None);
    }

    #[test]
    fn test_cached_key_without_artifact_fails() {
        let scratch = TempDir::new().unwrap();
        let bundle = scratch.path().join("bundle");
        std::fs::create_dir(&bundle).unwrap();
        std::fs::write(bundle.join("other.csv"), "x").unwrap();
        let store = MemoryArtifactStore::new();
        store.put(&pair().cache_key(), &bundle).unwrap();

        let mut sim = FixedSim::new("80");
        let mut runner = SimulationRunner::new(RecordingConfig::default(), &mut sim, "car.csv");
        let err = runner.evaluate(&store, &pair()).unwrap_err();
        assert!(matches!(err, Error::SimulationFailure(msg) if msg.contains("lap.csv")));
    }
}
