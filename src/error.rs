//! Error types for downforce
//!
//! Every failure in the search loop is fatal for the run: nothing here is
//! retried, and a failed candidate aborts the optimisation that asked for it.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// downforce error types
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or contradictory arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vehicle configuration could not be read or written
    #[error("Vehicle config write failed: {0}")]
    ConfigWrite(String),

    /// The external simulator did not produce the expected artifacts
    #[error("Simulation failed: {0}\nCheck the simulator output directory and its logs")]
    SimulationFailure(String),

    /// Neighbour narrowing hit the edge of the sampled interval
    #[error(
        "Search diverged: best lap at sample {index} of {samples} lies on the boundary of [{start}, {end}]\n\
         Widen the starting range or use the `extend` boundary policy"
    )]
    SearchDivergence {
        /// Index of the best sample in its pass
        index: usize,
        /// Number of samples in the pass
        samples: usize,
        /// First bound of the interval that was sampled
        start: f64,
        /// Second bound of the interval that was sampled
        end: f64,
    },

    /// Session or artifact store error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::StorageError(format!("session manifest: {err}"))
    }
}
