//! Layered configuration loading using figment.
//!
//! Sources (in priority order, highest wins):
//! 1. Environment variables (`DOWNFORCE_*` prefix, `__` as separator)
//! 2. `downforce.toml` in the working directory, or an explicit path
//! 3. Built-in defaults
//!
//! `DOWNFORCE_SEARCH__ITERATIONS=8` maps to `search.iterations`,
//! `DOWNFORCE_PATHS__RESULTS_DIR=out` to `paths.results_dir`.
//!
//! ```toml
//! [search]
//! starting_range = [-1.0, -10.0]
//! iterations = 5
//! samples = 4
//! boundary = "extend"
//!
//! [simulator]
//! program = "matlab"
//! build_args = ["-batch", "OpenVEHICLE"]
//! lap_args = ["-batch", "OpenLAP"]
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::aero::{PolarModel, DEFAULT_SIGFIGS};
use crate::external::{DEFAULT_HEADER_ROWS, DEFAULT_TIME_COLUMN};
use crate::optimiser::BoundaryPolicy;
use crate::{Error, Result};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "downforce.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DOWNFORCE_";

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root under which session directories are created
    pub results_dir: PathBuf,
    /// Directory holding vehicle templates
    pub templates_dir: PathBuf,
    /// Working directory of the external simulator
    pub simulator_dir: PathBuf,
    /// Directory for log files
    pub logs_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("../results"),
            templates_dir: PathBuf::from("../vehicle templates"),
            simulator_dir: PathBuf::from("../libs/openlap"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

/// Optimiser settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lift range of the first pass, in sampling order
    pub starting_range: [f64; 2],
    /// Number of narrowing passes
    pub iterations: usize,
    /// Candidates per pass
    pub samples: usize,
    /// Significant figures for keys and reported values
    pub sigfigs: usize,
    /// What to do when the best sample lies on a boundary
    pub boundary: BoundaryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            starting_range: [-1.0, -10.0],
            iterations: 5,
            samples: 4,
            sigfigs: DEFAULT_SIGFIGS,
            boundary: BoundaryPolicy::default(),
        }
    }
}

/// External simulator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Program run for both phases
    pub program: String,
    /// Arguments of the vehicle-build phase
    pub build_args: Vec<String>,
    /// Arguments of the lap-simulation phase
    pub lap_args: Vec<String>,
    /// Vehicle input file, relative to the simulator directory
    pub vehicle_file: String,
    /// Output directory, relative to the simulator directory
    pub output_dir: String,
    /// Lap-time table within the output directory
    pub artifact: String,
    /// Preamble lines before the lap table header
    pub header_rows: usize,
    /// Column holding the lap time
    pub time_column: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: "matlab".to_string(),
            build_args: vec!["-batch".to_string(), "OpenVEHICLE".to_string()],
            lap_args: vec!["-batch".to_string(), "OpenLAP".to_string()],
            vehicle_file: "car.csv".to_string(),
            output_dir: "OpenLap Sims".to_string(),
            artifact: "OpenLAP_sim.csv".to_string(),
            header_rows: DEFAULT_HEADER_ROWS,
            time_column: DEFAULT_TIME_COLUMN.to_string(),
        }
    }
}

/// Vehicle template selection and layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Template file name within the templates directory
    pub template: String,
    /// Description of the drag coefficient row
    pub drag_row: String,
    /// Description of the lift coefficient row
    pub lift_row: String,
    /// Header of the description column
    pub description_column: String,
    /// Header of the value column
    pub value_column: String,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            template: "RB21-E.csv".to_string(),
            drag_row: "Drag Coefficient CD".to_string(),
            lift_row: "Lift Coefficient CL".to_string(),
            description_column: "Description".to_string(),
            value_column: "Value".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AeroConfig {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,
    /// Drag polar parameters
    #[serde(default)]
    pub polar: PolarModel,
    /// Optimiser settings
    #[serde(default)]
    pub search: SearchConfig,
    /// External simulator invocation
    #[serde(default)]
    pub simulator: SimulatorConfig,
    /// Vehicle template
    #[serde(default)]
    pub vehicle: VehicleConfig,
}

impl AeroConfig {
    /// Load from defaults, `downforce.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source is malformed or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load with an explicit TOML file in place of `downforce.toml`.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source is malformed or validation fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The layered figment, before extraction.
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check value ranges the search depends on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.iterations == 0 {
            return Err(Error::Config("search.iterations must be at least 1".to_string()));
        }
        if search.samples < 3 {
            return Err(Error::Config(format!(
                "search.samples must be at least 3, got {}",
                search.samples
            )));
        }
        if search.sigfigs == 0 {
            return Err(Error::Config("search.sigfigs must be at least 1".to_string()));
        }
        if !search.starting_range.iter().all(|b| b.is_finite()) {
            return Err(Error::Config(
                "search.starting_range bounds must be finite".to_string(),
            ));
        }
        let polar = &self.polar;
        if ![polar.lift0, polar.drag0, polar.k].iter().all(|v| v.is_finite()) {
            return Err(Error::Config("polar parameters must be finite".to_string()));
        }
        if self.simulator.program.trim().is_empty() {
            return Err(Error::Config("simulator.program must not be empty".to_string()));
        }
        Ok(())
    }
}
