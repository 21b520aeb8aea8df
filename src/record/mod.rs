//! Search records
//!
//! The values the search produces and passes around:
//!
//! ```text
//! SearchInterval ──sample──> CoefficientPair (N) ──simulate──> SimulationResult (N)
//!                                                                    │
//!                                                              ResultTable (1 per pass)
//! ```

mod interval;
mod pair;
mod result;
mod table;

pub use interval::SearchInterval;
pub use pair::CoefficientPair;
pub use result::SimulationResult;
pub use table::{ResultTable, TABLE_HEADER};
