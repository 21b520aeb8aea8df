//! Result Table - one sampling pass worth of simulation results
//!
//! Rows are kept in sample order: row `i` is the `i`-th candidate along the
//! swept interval. Tables persist as CSV with an index column followed by
//! `time,cl,cdf,cd`.

use std::fmt::Write as _;
use std::path::Path;

use super::SimulationResult;
use crate::{Error, Result};

/// CSV header of a persisted table.
pub const TABLE_HEADER: &str = ",time,cl,cdf,cd";

/// Ordered results of one sampling pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<SimulationResult>,
}

impl ResultTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append the next sample's result.
    pub fn push(&mut self, result: SimulationResult) {
        self.rows.push(result);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at sample position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SimulationResult> {
        self.rows.get(index)
    }

    /// All rows in sample order.
    #[must_use]
    pub fn rows(&self) -> &[SimulationResult] {
        &self.rows
    }

    /// Index of the fastest lap. Ties resolve to the earliest sample.
    #[must_use]
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, row) in self.rows.iter().enumerate() {
            let time = row.lap_time();
            if time.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, fastest)| time < fastest) {
                best = Some((index, time));
            }
        }
        best.map(|(index, _)| index)
    }

    /// The fastest row, if any.
    #[must_use]
    pub fn best(&self) -> Option<&SimulationResult> {
        self.best_index().and_then(|index| self.rows.get(index))
    }

    /// Render the table as CSV.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(TABLE_HEADER.len() + 1 + self.rows.len() * 48);
        out.push_str(TABLE_HEADER);
        out.push('\n');
        for (index, row) in self.rows.iter().enumerate() {
            let _ = writeln!(
                out,
                "{index},{},{},{},{}",
                row.lap_time(),
                row.lift_coefficient(),
                row.downforce_coefficient(),
                row.drag_coefficient()
            );
        }
        out
    }

    /// Parse a table previously written by [`ResultTable::to_csv`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if the header or any row is malformed.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        match lines.next() {
            Some(header) if header.trim() == TABLE_HEADER => {}
            other => {
                return Err(Error::StorageError(format!(
                    "unexpected result table header: {other:?}"
                )))
            }
        }

        let mut table = Self::new();
        for (line_no, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let [_, time, cl, cdf, cd] = fields.as_slice() else {
                return Err(Error::StorageError(format!(
                    "result table row {line_no} has {} fields, expected 5",
                    fields.len()
                )));
            };
            let parse = |field: &str| {
                field.parse::<f64>().map_err(|_| {
                    Error::StorageError(format!("result table row {line_no}: '{field}' is not a number"))
                })
            };
            table.push(SimulationResult::from_columns(
                parse(time)?,
                parse(cl)?,
                parse(cdf)?,
                parse(cd)?,
            ));
        }
        Ok(table)
    }

    /// Write the table to `path` as CSV.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be written.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_csv())?;
        Ok(())
    }

    /// Read a table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a storage error if
    /// its content is malformed.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_csv(&text)
    }
}

impl FromIterator<SimulationResult> for ResultTable {
    fn from_iter<I: IntoIterator<Item = SimulationResult>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a SimulationResult;
    type IntoIter = std::slice::Iter<'a, SimulationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(times: &[f64]) -> ResultTable {
        times
            .iter()
            .enumerate()
            .map(|(i, &time)| {
                #[allow(clippy::cast_precision_loss)]
                let lift = -(i as f64) - 1.0;
                SimulationResult::from_columns(time, lift, -lift, 0.7)
            })
            .collect()
    }

    #[test]
    fn test_best_index() {
        let table = table(&[10.0, 8.0, 12.0, 15.0]);
        assert_eq!(table.best_index(), Some(1));
        assert_eq!(table.best().map(SimulationResult::lap_time), Some(8.0));
    }

    #[test]
    fn test_best_index_ties_take_first() {
        let table = table(&[9.0, 7.0, 7.0, 9.0]);
        assert_eq!(table.best_index(), Some(1));
    }

    #[test]
    fn test_best_index_skips_nan() {
        let table = table(&[f64::NAN, 9.0, 8.5]);
        assert_eq!(table.best_index(), Some(2));
    }

    #[test]
    fn test_best_index_empty() {
        assert_eq!(ResultTable::new().best_index(), None);
    }

    #[test]
    fn test_csv_layout() {
        let csv = table(&[80.5, 79.25]).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ",time,cl,cdf,cd");
        assert_eq!(lines[1], "0,80.5,-1,1,0.7");
        assert_eq!(lines[2], "1,79.25,-2,2,0.7");
    }

    #[test]
    fn test_csv_read_back() {
        let original = table(&[80.5, 79.25, 81.0]);
        let parsed = ResultTable::from_csv(&original.to_csv()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_csv_bad_header() {
        let err = ResultTable::from_csv("time,cl\n").unwrap_err();
        assert!(matches!(err, Error::StorageError(_)));
    }

    #[test]
    fn test_csv_bad_row() {
        let err = ResultTable::from_csv(",time,cl,cdf,cd\n0,x,1,2,3\n").unwrap_err();
        assert!(matches!(err, Error::StorageError(msg) if msg.contains("'x'")));
    }
}
