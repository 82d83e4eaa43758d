// IMU Filter Core - signal processing for video/IMU recording sessions
// Scalar Kalman smoothing and per-axis Butterworth high-pass filtering

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod filters;
pub mod imu;
pub mod logging;
pub mod pipeline;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{ErrorCode, FilterError, ImuLogError, PipelineError};
pub use filters::{
    ButterworthHighPass, FilterState, HighPassPrimitive, SampleBuffer, ScalarKalmanFilter,
    VectorHighPassFilter,
};
pub use imu::{ImuLog, SensorStream};
pub use logging::init_logging;
pub use pipeline::{FilterPipeline, PipelineReport};
