// ScalarKalmanFilter - one-dimensional recursive estimator
//
// Tracks a slowly varying scalar observed through noisy measurements using
// the discrete Kalman recursion with an identity (no-change) process model:
//
//   predict:  P = P + Q
//   update:   K = P / (P + R)
//             x = x + K * (z - x)
//             P = (1 - K) * P
//
// One instance models one independent stream. Call `predict` then `update`
// exactly once per measurement.

use serde::{Deserialize, Serialize};

use crate::config::KalmanConfig;
use crate::error::FilterError;

/// Running state of a scalar Kalman filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Current best estimate of the true value
    pub estimate: f64,
    /// Uncertainty of `estimate`, never negative
    pub error_covariance: f64,
    /// Q: expected drift between samples
    pub process_noise: f64,
    /// R: expected measurement noise
    pub measurement_noise: f64,
}

/// Scalar Kalman filter with identity transition
#[derive(Debug, Clone)]
pub struct ScalarKalmanFilter {
    state: FilterState,
    last_gain: Option<f64>,
}

impl ScalarKalmanFilter {
    /// Create a new filter
    ///
    /// # Arguments
    /// * `initial_estimate` - Starting estimate (finite)
    /// * `initial_error_covariance` - Starting uncertainty (>= 0)
    /// * `process_noise` - Q (>= 0)
    /// * `measurement_noise` - R (> 0)
    ///
    /// # Errors
    /// `FilterError::InvalidParameter` when any argument is outside its domain.
    pub fn new(
        initial_estimate: f64,
        initial_error_covariance: f64,
        process_noise: f64,
        measurement_noise: f64,
    ) -> Result<Self, FilterError> {
        if !initial_estimate.is_finite() {
            return Err(FilterError::invalid(
                "initial_estimate",
                format!("must be finite (got {})", initial_estimate),
            ));
        }
        if !(initial_error_covariance.is_finite() && initial_error_covariance >= 0.0) {
            return Err(FilterError::invalid(
                "initial_error_covariance",
                format!("must be finite and >= 0 (got {})", initial_error_covariance),
            ));
        }
        if !(process_noise.is_finite() && process_noise >= 0.0) {
            return Err(FilterError::invalid(
                "process_noise",
                format!("must be finite and >= 0 (got {})", process_noise),
            ));
        }
        if !(measurement_noise.is_finite() && measurement_noise > 0.0) {
            return Err(FilterError::invalid(
                "measurement_noise",
                format!("must be finite and > 0 (got {})", measurement_noise),
            ));
        }

        Ok(Self {
            state: FilterState {
                estimate: initial_estimate,
                error_covariance: initial_error_covariance,
                process_noise,
                measurement_noise,
            },
            last_gain: None,
        })
    }

    /// Create a filter from the `kalman` configuration section
    pub fn from_config(config: &KalmanConfig) -> Result<Self, FilterError> {
        Self::new(
            config.initial_estimate,
            config.initial_error_covariance,
            config.process_noise,
            config.measurement_noise,
        )
    }

    /// Time update: grow the covariance by Q, leave the estimate unchanged
    pub fn predict(&mut self) -> f64 {
        self.state.error_covariance += self.state.process_noise;
        self.state.estimate
    }

    /// Measurement update, returns the corrected estimate
    pub fn update(&mut self, measurement: f64) -> f64 {
        let p = self.state.error_covariance;
        let gain = p / (p + self.state.measurement_noise);

        self.state.estimate += gain * (measurement - self.state.estimate);
        // (1 - K) * P == P * R / (P + R); clamp away rounding below zero
        self.state.error_covariance = ((1.0 - gain) * p).max(0.0);
        self.last_gain = Some(gain);

        self.state.estimate
    }

    /// Run `predict(); update(m)` for every measurement in order
    pub fn filter_sequence(&mut self, measurements: &[f64]) -> Vec<f64> {
        measurements
            .iter()
            .map(|&m| {
                self.predict();
                self.update(m)
            })
            .collect()
    }

    pub fn estimate(&self) -> f64 {
        self.state.estimate
    }

    pub fn error_covariance(&self) -> f64 {
        self.state.error_covariance
    }

    /// Gain used by the most recent `update`, if any
    pub fn last_gain(&self) -> Option<f64> {
        self.last_gain
    }

    /// Snapshot of the running state
    pub fn state(&self) -> FilterState {
        self.state
    }
}
