// Filter error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Filter error code constants
///
/// Single source of truth for the codes shared with the Android layer.
///
/// Error code range: 1001-1002
pub struct FilterErrorCodes {}

impl FilterErrorCodes {
    /// A construction or call parameter is outside its documented domain
    pub const INVALID_PARAMETER: i32 = 1001;

    /// The high-pass primitive returned a sequence of the wrong length
    pub const FILTER_LENGTH_MISMATCH: i32 = 1002;
}

/// Log a filter error with structured context
///
/// Emits the error code, the component and the human-readable message
/// alongside the caller supplied context.
pub fn log_filter_error(err: &FilterError, context: &str) {
    error!(
        "Filter error in {}: code={}, component=FilterCore, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Filtering errors
///
/// All variants are deterministic functions of the inputs; nothing here is
/// transient or worth retrying.
///
/// Error code range: 1001-1002
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Parameter outside its valid domain (e.g. measurement noise <= 0,
    /// ragged sample buffer, cutoff above Nyquist)
    InvalidParameter { name: String, reason: String },

    /// High-pass primitive returned `actual` values for a column of `expected`
    FilterLengthMismatch {
        dimension: usize,
        expected: usize,
        actual: usize,
    },
}

impl FilterError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for FilterError {
    fn code(&self) -> i32 {
        match self {
            FilterError::InvalidParameter { .. } => FilterErrorCodes::INVALID_PARAMETER,
            FilterError::FilterLengthMismatch { .. } => FilterErrorCodes::FILTER_LENGTH_MISMATCH,
        }
    }

    fn message(&self) -> String {
        match self {
            FilterError::InvalidParameter { name, reason } => {
                format!("Invalid parameter '{}': {}", name, reason)
            }
            FilterError::FilterLengthMismatch {
                dimension,
                expected,
                actual,
            } => format!(
                "High-pass output length mismatch in dimension {}: expected {}, got {}",
                dimension, expected, actual
            ),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilterError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_codes() {
        assert_eq!(
            FilterError::invalid("measurement_noise", "must be > 0").code(),
            FilterErrorCodes::INVALID_PARAMETER
        );
        assert_eq!(
            FilterError::FilterLengthMismatch {
                dimension: 0,
                expected: 4,
                actual: 3
            }
            .code(),
            FilterErrorCodes::FILTER_LENGTH_MISMATCH
        );
    }

    #[test]
    fn test_filter_error_messages() {
        let err = FilterError::invalid("measurement_noise", "must be > 0 (got 0)");
        assert_eq!(
            err.message(),
            "Invalid parameter 'measurement_noise': must be > 0 (got 0)"
        );

        let err = FilterError::FilterLengthMismatch {
            dimension: 2,
            expected: 10,
            actual: 9,
        };
        assert!(err.message().contains("dimension 2"));
        assert!(err.message().contains("expected 10, got 9"));
    }

    #[test]
    fn test_filter_error_display() {
        let err = FilterError::invalid("order", "must be >= 1");
        let display = format!("{}", err);
        assert!(display.contains("FilterError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
