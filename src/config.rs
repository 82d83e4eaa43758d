//! Configuration management for filter tuning
//!
//! Filter parameters are loaded from a JSON file so they can be tuned
//! against recorded sessions without recompiling. Missing sections or
//! fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::filters::DEFAULT_CUTOFF_FACTOR;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub kalman: KalmanConfig,
    pub high_pass: HighPassConfig,
    pub pipeline: PipelineConfig,
}

/// Scalar Kalman filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanConfig {
    pub initial_estimate: f64,
    pub initial_error_covariance: f64,
    /// Q: expected drift of the true value between samples
    pub process_noise: f64,
    /// R: expected noise of each measurement, must be > 0
    pub measurement_noise: f64,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            initial_estimate: 0.0,
            initial_error_covariance: 1.0,
            process_noise: 0.01,
            measurement_noise: 0.1,
        }
    }
}

/// Butterworth high-pass stage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighPassConfig {
    pub enabled: bool,
    /// Cutoff in Hz is `cutoff_factor * avg_sample_interval`
    pub cutoff_factor: f64,
    /// Butterworth order (>= 1)
    pub order: usize,
}

impl Default for HighPassConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_factor: DEFAULT_CUTOFF_FACTOR,
            order: 1,
        }
    }
}

/// Log processing pipeline options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run every axis through a scalar Kalman filter after the high-pass stage
    pub smooth: bool,
    /// Upper edge (Hz) of the band reported as low-frequency energy
    pub low_band_hz: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smooth: false,
            low_band_hz: 0.5,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, propagating errors
    pub fn try_load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&contents)?;
        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Load configuration from JSON file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults (with a warning) if the file
    /// is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "[Config] Failed to load {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
