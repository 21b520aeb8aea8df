//! Lap-time artifact parsing
//!
//! The simulator writes a delimited table preceded by a free-form preamble:
//!
//! ```text
//! <header_rows lines of preamble>
//! time,distance,speed,...      <- column names
//! [s],[m],[m/s],...            <- units
//! 0,0,12.1,...
//! ...
//! 81.734,5793,74.2,...         <- last row: final lap time
//! ```

use crate::aero::{parse_sigfigs, DEFAULT_SIGFIGS};
use crate::{Error, Result};

/// Default number of preamble lines before the column header.
pub const DEFAULT_HEADER_ROWS: usize = 10;

/// Default name of the lap-time column.
pub const DEFAULT_TIME_COLUMN: &str = "time";

/// Layout of the simulator's lap-time table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapTimeFormat {
    header_rows: usize,
    time_column: String,
    sigfigs: usize,
}

impl Default for LapTimeFormat {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_ROWS, DEFAULT_TIME_COLUMN)
    }
}

impl LapTimeFormat {
    /// Format with `header_rows` preamble lines and the lap time in `time_column`.
    #[must_use]
    pub fn new(header_rows: usize, time_column: impl Into<String>) -> Self {
        Self {
            header_rows,
            time_column: time_column.into(),
            sigfigs: DEFAULT_SIGFIGS,
        }
    }

    /// Set the significant figures the lap time is rounded to.
    #[must_use]
    pub const fn sigfigs(mut self, sigfigs: usize) -> Self {
        self.sigfigs = sigfigs;
        self
    }

    /// Extract the final lap time from a lap-time table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SimulationFailure`] if the table is truncated or has
    /// no time column, and [`Error::InvalidInput`] if the final time is not a
    /// number.
    pub fn parse(&self, bytes: &[u8]) -> Result<f64> {
        let text = String::from_utf8_lossy(bytes);
        let mut lines = text.lines().skip(self.header_rows);

        let header = lines.next().ok_or_else(|| {
            Error::SimulationFailure(format!(
                "lap table ends before its column header (line {})",
                self.header_rows + 1
            ))
        })?;
        let column = header
            .split(',')
            .position(|name| name.trim() == self.time_column)
            .ok_or_else(|| {
                Error::SimulationFailure(format!(
                    "lap table has no '{}' column",
                    self.time_column
                ))
            })?;

        // First row after the header holds units.
        let last = lines
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .last()
            .ok_or_else(|| Error::SimulationFailure("lap table has no data rows".to_string()))?;

        let field = last.split(',').nth(column).ok_or_else(|| {
            Error::SimulationFailure(format!("last lap table row has no field {column}"))
        })?;
        parse_sigfigs(field, self.sigfigs)
    }
}
