//! Shared stubs for the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use downforce::external::{LapSimulator, VehicleConfigStore};
use downforce::record::CoefficientPair;
use downforce::{Error, Result};
use tempfile::TempDir;

pub const ARTIFACT: &str = "OpenLAP_sim.csv";

/// Lap-time table in the simulator's layout: ten preamble lines, a header, a
/// units row, then one row per distance step.
pub fn lap_table(lap_time: f64) -> String {
    let mut text = String::new();
    for i in 0..10 {
        text.push_str(&format!("preamble line {i}\n"));
    }
    text.push_str("time,distance,speed\n");
    text.push_str("[s],[m],[m/s]\n");
    text.push_str("0,0,0\n");
    text.push_str(&format!("{},5000,62.1\n", lap_time / 2.0));
    text.push_str(&format!("{lap_time},10000,60.4\n"));
    text
}

/// Simulator that answers with a scripted sequence of lap times.
///
/// Every `simulate_lap` consumes one time; an exhausted script is a failure.
pub struct ScriptedSimulator {
    dir: TempDir,
    times: VecDeque<f64>,
    pub builds: usize,
    pub runs: usize,
}

impl ScriptedSimulator {
    pub fn new(times: &[f64]) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            times: times.iter().copied().collect(),
            builds: 0,
            runs: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.times.len()
    }
}

impl LapSimulator for ScriptedSimulator {
    fn build_vehicle_model(&mut self) -> Result<()> {
        self.builds += 1;
        Ok(())
    }

    fn simulate_lap(&mut self) -> Result<()> {
        let lap_time = self
            .times
            .pop_front()
            .ok_or_else(|| Error::SimulationFailure("lap script exhausted".to_string()))?;
        self.runs += 1;
        let out = self.output_dir();
        std::fs::create_dir_all(&out)?;
        std::fs::write(out.join(ARTIFACT), lap_table(lap_time))?;
        Ok(())
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("OpenLap Sims")
    }

    fn artifact_name(&self) -> &str {
        ARTIFACT
    }
}

/// Vehicle configuration that only remembers what it was asked to write.
#[derive(Default)]
pub struct RecordingVehicle {
    pub written: RefCell<Vec<CoefficientPair>>,
}

impl RecordingVehicle {
    pub fn lifts(&self) -> Vec<f64> {
        self.written.borrow().iter().map(CoefficientPair::lift).collect()
    }
}

impl VehicleConfigStore for RecordingVehicle {
    fn write(&self, pair: &CoefficientPair, _vehicle_template: &str) -> Result<()> {
        self.written.borrow_mut().push(*pair);
        Ok(())
    }
}
