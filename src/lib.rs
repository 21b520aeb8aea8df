//! # downforce: lap-time driven aero coefficient search
//!
//! Finds the lift/drag coefficient pair that minimises a simulated lap time.
//! Candidates are sampled across a lift range, each one is pushed through an
//! external lap simulator (or answered from the session cache), and the range
//! is narrowed around the fastest sample for a fixed number of passes.
//!
//! ## Pipeline
//!
//! ```text
//! RangeOptimiser ─> PairSampler ─> PolarModel ─> SimulationRunner ─> LapSimulator
//!       ^                                              │
//!       └────────────── ResultTable <──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use downforce::config::AeroConfig;
//! use downforce::external::{CommandSimulator, TemplateConfigStore};
//! use downforce::optimiser::RangeOptimiser;
//! use downforce::record::SearchInterval;
//! use downforce::runner::SimulationRunner;
//! use downforce::session::{SearchSession, SessionKind};
//!
//! let config = AeroConfig::load()?;
//! let mut simulator =
//!     CommandSimulator::start(&config.paths.simulator_dir, config.simulator.clone())?;
//! let vehicle = TemplateConfigStore::new(&config.paths.templates_dir, simulator.vehicle_file());
//! let mut runner = SimulationRunner::new(vehicle, &mut simulator, &config.vehicle.template);
//! let mut session = SearchSession::open(&config.paths.results_dir, "tt", SessionKind::Optimise)?;
//!
//! let optimum = RangeOptimiser::new(config.polar).optimise(
//!     &mut runner,
//!     &mut session,
//!     5,
//!     SearchInterval::new(-1.0, -10.0),
//!     4,
//! )?;
//! println!("{}", optimum.best());
//! # Ok::<(), downforce::Error>(())
//! ```
//!
//! ## Diagnostics
//!
//! The library logs through `tracing` and never installs a subscriber; the
//! caller decides where events go.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aero;
pub mod config;
pub mod error;
pub mod external;
pub mod kv;
pub mod optimiser;
pub mod record;
pub mod runner;
pub mod session;

pub use error::{Error, Result};
