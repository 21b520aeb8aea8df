//! Aerodynamic coefficient modelling
//!
//! The pieces the search needs before any simulation happens: the drag polar,
//! significant-figure rounding, and the sampler that walks a coefficient range.
//!
//! ```rust
//! use downforce::aero::{sample_pairs, PolarModel, SampleRange};
//!
//! for pair in sample_pairs(SampleRange::Downforce([1.0, 4.0]), 4, PolarModel::default()) {
//!     println!("cl={} cd={}", pair.lift(), pair.drag());
//! }
//! ```

mod polar;
mod sampler;
mod sigfig;

pub use polar::{
    drag_from_downforce_or_lift, Coefficient, PolarModel, DEFAULT_DRAG0, DEFAULT_K, DEFAULT_LIFT0,
};
pub use sampler::{sample_pairs, PairSampler, SampleRange};
pub use sigfig::{parse_sigfigs, round_sigfigs, DEFAULT_SIGFIGS};
