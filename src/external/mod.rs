//! External collaborators of the search
//!
//! The search writes each candidate into the simulator's vehicle input, runs
//! the simulator's two phases, and reads a lap time back out of its output.
//! Those three concerns are traits here so the runner can be driven by the
//! real simulator or by a stub.

mod artifact;
mod command;
mod template;

pub use artifact::{LapTimeFormat, DEFAULT_HEADER_ROWS, DEFAULT_TIME_COLUMN};
pub use command::CommandSimulator;
pub use template::{TemplateConfigStore, TemplateLayout};

use std::path::PathBuf;

use crate::record::CoefficientPair;
use crate::Result;

/// Persists a candidate into the simulator's input configuration.
pub trait VehicleConfigStore {
    /// Write `pair` into the vehicle configuration built from `vehicle_template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`](crate::Error::ConfigWrite) if the
    /// template cannot be parsed or the target cannot be written.
    fn write(&self, pair: &CoefficientPair, vehicle_template: &str) -> Result<()>;
}

impl<C: VehicleConfigStore + ?Sized> VehicleConfigStore for &C {
    fn write(&self, pair: &CoefficientPair, vehicle_template: &str) -> Result<()> {
        (**self).write(pair, vehicle_template)
    }
}

/// Single-instance external lap simulator.
///
/// Both phases block until the simulator finishes. After `simulate_lap`
/// the run's artifacts sit in [`output_dir`](LapSimulator::output_dir) until
/// someone moves them away; the next run writes to the same place.
pub trait LapSimulator {
    /// Build the vehicle model from the current vehicle configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SimulationFailure`](crate::Error::SimulationFailure)
    /// if the simulator fails.
    fn build_vehicle_model(&mut self) -> Result<()>;

    /// Simulate a lap with the last built vehicle model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SimulationFailure`](crate::Error::SimulationFailure)
    /// if the simulator fails.
    fn simulate_lap(&mut self) -> Result<()>;

    /// Directory holding the artifacts of the last run.
    fn output_dir(&self) -> PathBuf;

    /// File name of the lap-time table within the output directory.
    fn artifact_name(&self) -> &str;
}

impl<S: LapSimulator + ?Sized> LapSimulator for &mut S {
    fn build_vehicle_model(&mut self) -> Result<()> {
        (**self).build_vehicle_model()
    }

    fn simulate_lap(&mut self) -> Result<()> {
        (**self).simulate_lap()
    }

    fn output_dir(&self) -> PathBuf {
        (**self).output_dir()
    }

    fn artifact_name(&self) -> &str {
        (**self).artifact_name()
    }
}
