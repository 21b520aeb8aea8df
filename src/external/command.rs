//! Simulator driven through external commands
//!
//! Each pipeline phase is one program invocation run to completion inside the
//! simulator directory. The simulator writes its artifacts to a fixed output
//! directory there, which is why candidates have to be run one at a time.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::LapSimulator;
use crate::config::SimulatorConfig;
use crate::{Error, Result};

/// Lap simulator that shells out for the build and lap phases.
#[derive(Debug, Clone)]
pub struct CommandSimulator {
    workdir: PathBuf,
    config: SimulatorConfig,
}

impl CommandSimulator {
    /// Start a simulator working in `workdir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SimulationFailure`] if `workdir` is not a directory.
    pub fn start(workdir: impl Into<PathBuf>, config: SimulatorConfig) -> Result<Self> {
        let workdir = workdir.into();
        if !workdir.is_dir() {
            return Err(Error::SimulationFailure(format!(
                "simulator directory {} does not exist",
                workdir.display()
            )));
        }
        tracing::info!(workdir = %workdir.display(), program = %config.program, "simulator started");
        Ok(Self { workdir, config })
    }

    /// Directory the simulator runs in.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Path the vehicle input file is expected at.
    #[must_use]
    pub fn vehicle_file(&self) -> PathBuf {
        self.workdir.join(&self.config.vehicle_file)
    }

    fn run(&self, phase: &str, args: &[String]) -> Result<()> {
        let output = Command::new(&self.config.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| {
                Error::SimulationFailure(format!(
                    "{phase}: cannot launch '{}': {e}",
                    self.config.program
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(phase, %stderr, "simulator stderr");
            return Err(Error::SimulationFailure(format!(
                "{phase}: '{}' exited with {}",
                self.config.program, output.status
            )));
        }
        tracing::debug!(phase, "simulator phase complete");
        Ok(())
    }
}

impl LapSimulator for CommandSimulator {
    fn build_vehicle_model(&mut self) -> Result<()> {
        self.run("build vehicle", &self.config.build_args)
    }

    fn simulate_lap(&mut self) -> Result<()> {
        self.run("simulate lap", &self.config.lap_args)
    }

    fn output_dir(&self) -> PathBuf {
        self.workdir.join(&self.config.output_dir)
    }

    fn artifact_name(&self) -> &str {
        &self.config.artifact
    }
}
