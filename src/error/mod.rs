// Error types for the IMU filter core
//
// This module defines custom error types for filtering and IMU log operations,
// providing structured error handling with stable numeric codes that the
// recorder application can forward over JNI.

use std::fmt;

mod filter;
mod imu_log;

pub use filter::{log_filter_error, FilterError, FilterErrorCodes};
pub use imu_log::{log_imu_log_error, ImuLogError, ImuLogErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the native boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Failure of a log filtering run: either the log or a filter stage
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Log(ImuLogError),
    Filter(FilterError),
}

impl ErrorCode for PipelineError {
    fn code(&self) -> i32 {
        match self {
            PipelineError::Log(err) => err.code(),
            PipelineError::Filter(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            PipelineError::Log(err) => err.message(),
            PipelineError::Filter(err) => err.message(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Log(err) => fmt::Display::fmt(err, f),
            PipelineError::Filter(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Log(err) => Some(err),
            PipelineError::Filter(err) => Some(err),
        }
    }
}

impl From<ImuLogError> for PipelineError {
    fn from(err: ImuLogError) -> Self {
        PipelineError::Log(err)
    }
}

impl From<FilterError> for PipelineError {
    fn from(err: FilterError) -> Self {
        PipelineError::Filter(err)
    }
}
