//! Numeric filtering core.
//!
//! - [`ScalarKalmanFilter`]: recursive scalar estimator for one sensor axis
//! - [`VectorHighPassFilter`]: per-dimension batch high-pass over buffered vectors
//! - [`ButterworthHighPass`]: default [`HighPassPrimitive`] implementation

pub mod butterworth;
pub mod highpass;
pub mod kalman;

pub use butterworth::{Biquad, ButterworthHighPass};
pub use highpass::{
    validate_dimensions, HighPassPrimitive, SampleBuffer, VectorHighPassFilter,
    DEFAULT_CUTOFF_FACTOR,
};
pub use kalman::{FilterState, ScalarKalmanFilter};
