// IMU log error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// IMU log error code constants
///
/// Error code range: 2001-2004
pub struct ImuLogErrorCodes {}

impl ImuLogErrorCodes {
    /// Reading or writing the log failed
    pub const IO: i32 = 2001;

    /// A line does not match the recorder format
    pub const MALFORMED_LINE: i32 = 2002;

    /// A sensor reported vectors of differing length
    pub const INCONSISTENT_DIMENSION: i32 = 2003;

    /// The log contains no sensor samples
    pub const EMPTY_LOG: i32 = 2004;
}

/// Log an IMU log error with structured context
pub fn log_imu_log_error(err: &ImuLogError, context: &str) {
    error!(
        "IMU log error in {}: code={}, component=ImuLog, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while reading, grouping or writing recorder logs
///
/// Error code range: 2001-2004
#[derive(Debug, Clone, PartialEq)]
pub enum ImuLogError {
    /// Underlying reader/writer failure
    Io { details: String },

    /// Line `line` (1-based) could not be parsed
    MalformedLine { line: usize, reason: String },

    /// Sensor `sensor` switched from `expected` to `actual` components
    InconsistentDimension {
        sensor: String,
        expected: usize,
        actual: usize,
    },

    /// No sample lines were found
    EmptyLog,
}

impl ErrorCode for ImuLogError {
    fn code(&self) -> i32 {
        match self {
            ImuLogError::Io { .. } => ImuLogErrorCodes::IO,
            ImuLogError::MalformedLine { .. } => ImuLogErrorCodes::MALFORMED_LINE,
            ImuLogError::InconsistentDimension { .. } => ImuLogErrorCodes::INCONSISTENT_DIMENSION,
            ImuLogError::EmptyLog => ImuLogErrorCodes::EMPTY_LOG,
        }
    }

    fn message(&self) -> String {
        match self {
            ImuLogError::Io { details } => format!("IMU log I/O error: {}", details),
            ImuLogError::MalformedLine { line, reason } => {
                format!("Malformed IMU log line {}: {}", line, reason)
            }
            ImuLogError::InconsistentDimension {
                sensor,
                expected,
                actual,
            } => format!(
                "Sensor '{}' changed dimension: expected {}, got {}",
                sensor, expected, actual
            ),
            ImuLogError::EmptyLog => "IMU log contains no sensor samples".to_string(),
        }
    }
}

impl fmt::Display for ImuLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImuLogError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ImuLogError {}

/// Convert from std::io::Error to ImuLogError
impl From<std::io::Error> for ImuLogError {
    fn from(err: std::io::Error) -> Self {
        ImuLogError::Io {
            details: err.to_string(),
        }
    }
}
