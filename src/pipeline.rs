//! Log filtering pipeline.
//!
//! Runs every sensor stream of a recorder session through the high-pass
//! stage and, optionally, per-axis scalar Kalman smoothing, then rebuilds the
//! session with the filtered values and summarises each axis.

use serde::{Deserialize, Serialize};

use crate::analysis::{mean, std_dev, SpectrumAnalyzer};
use crate::config::{AppConfig, KalmanConfig};
use crate::error::{log_filter_error, log_imu_log_error, FilterError, PipelineError};
use crate::filters::{SampleBuffer, ScalarKalmanFilter, VectorHighPassFilter};
use crate::imu::{ImuLog, SensorStream, VideoStartMarker};

/// Before/after statistics for one axis of one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSummary {
    pub axis: usize,
    pub mean_before: f64,
    pub mean_after: f64,
    pub std_before: f64,
    pub std_after: f64,
    /// Share of energy below the configured low band, `None` if unknown rate
    pub low_band_ratio_before: Option<f64>,
    pub low_band_ratio_after: Option<f64>,
}

/// Outcome for one sensor stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamReport {
    pub sensor: String,
    pub sample_count: usize,
    pub dimension: usize,
    pub avg_sample_interval_s: f64,
    pub sample_rate_hz: f64,
    pub high_pass_applied: bool,
    pub smoothed: bool,
    pub axes: Vec<AxisSummary>,
}

/// Result of [`FilterPipeline::run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub streams: Vec<StreamReport>,
    pub video_start: Option<VideoStartMarker>,
    #[serde(skip)]
    pub filtered: ImuLog,
}

/// Configured high-pass + smoothing pipeline
pub struct FilterPipeline {
    high_pass: Option<VectorHighPassFilter>,
    smoothing: Option<KalmanConfig>,
    low_band_hz: f64,
    analyzer: SpectrumAnalyzer,
}

impl FilterPipeline {
    /// Build the pipeline, validating filter parameters up front
    pub fn from_config(config: &AppConfig) -> Result<Self, FilterError> {
        let high_pass = if config.high_pass.enabled {
            Some(VectorHighPassFilter::from_config(&config.high_pass)?)
        } else {
            None
        };

        let smoothing = if config.pipeline.smooth {
            // Reject bad noise parameters before touching any data
            ScalarKalmanFilter::from_config(&config.kalman)?;
            Some(config.kalman.clone())
        } else {
            None
        };

        Ok(Self {
            high_pass,
            smoothing,
            low_band_hz: config.pipeline.low_band_hz,
            analyzer: SpectrumAnalyzer::new(),
        })
    }

    /// Filter every sensor stream of `log`
    pub fn run(&self, log: &ImuLog) -> Result<PipelineReport, PipelineError> {
        let streams = log.streams().map_err(|err| {
            log_imu_log_error(&err, "FilterPipeline::run");
            err
        })?;
        let mut reports = Vec::with_capacity(streams.len());
        let mut filtered_streams = Vec::with_capacity(streams.len());

        for stream in &streams {
            let (report, filtered) = self.run_stream(stream).map_err(|err| {
                log_filter_error(&err, &stream.sensor);
                err
            })?;
            tracing::info!(
                "[Pipeline] {}: {} samples x {} at {:.2} Hz (high-pass: {}, smoothed: {})",
                report.sensor,
                report.sample_count,
                report.dimension,
                report.sample_rate_hz,
                report.high_pass_applied,
                report.smoothed
            );
            reports.push(report);
            filtered_streams.push(filtered);
        }

        Ok(PipelineReport {
            streams: reports,
            video_start: log.video_start(),
            filtered: log.with_streams(&filtered_streams),
        })
    }

    fn run_stream(
        &self,
        stream: &SensorStream,
    ) -> Result<(StreamReport, SensorStream), FilterError> {
        let original = stream.to_sample_buffer();
        let mut buffer = original.clone();
        let interval = buffer.avg_sample_interval;

        let high_pass_applied = match &self.high_pass {
            Some(_) if interval == 0.0 => {
                tracing::warn!(
                    "[Pipeline] {}: sample rate unknown, high-pass skipped",
                    stream.sensor
                );
                false
            }
            // Sparse sensors: cutoff grows with the interval while Nyquist shrinks
            Some(filter) if filter.cutoff_hz(interval) >= 0.5 / interval => {
                tracing::warn!(
                    "[Pipeline] {}: cutoff {:.3} Hz >= Nyquist {:.3} Hz, high-pass skipped",
                    stream.sensor,
                    filter.cutoff_hz(interval),
                    0.5 / interval
                );
                false
            }
            Some(filter) => {
                filter.filter_buffer(&mut buffer)?;
                true
            }
            None => false,
        };

        let smoothed = match &self.smoothing {
            Some(config) => {
                smooth_axes(&mut buffer, config)?;
                true
            }
            None => false,
        };

        let report = StreamReport {
            sensor: stream.sensor.clone(),
            sample_count: stream.len(),
            dimension: stream.dimension().unwrap_or(0),
            avg_sample_interval_s: interval,
            sample_rate_hz: stream.sample_rate(),
            high_pass_applied,
            smoothed,
            axes: self.summarize(&original, &buffer, stream.sample_rate()),
        };

        Ok((report, stream.with_values(buffer)))
    }

    fn summarize(
        &self,
        before: &SampleBuffer,
        after: &SampleBuffer,
        sample_rate: f64,
    ) -> Vec<AxisSummary> {
        let dimension = before.dimension().unwrap_or(0);
        (0..dimension)
            .map(|axis| {
                let b = before.column(axis).unwrap_or_default();
                let a = after.column(axis).unwrap_or_default();
                AxisSummary {
                    axis,
                    mean_before: mean(&b).unwrap_or(0.0),
                    mean_after: mean(&a).unwrap_or(0.0),
                    std_before: std_dev(&b).unwrap_or(0.0),
                    std_after: std_dev(&a).unwrap_or(0.0),
                    low_band_ratio_before: self
                        .analyzer
                        .low_band_energy_ratio(&b, sample_rate, self.low_band_hz),
                    low_band_ratio_after: self
                        .analyzer
                        .low_band_energy_ratio(&a, sample_rate, self.low_band_hz),
                }
            })
            .collect()
    }
}

/// Run each axis through its own scalar Kalman filter
fn smooth_axes(buffer: &mut SampleBuffer, config: &KalmanConfig) -> Result<(), FilterError> {
    let dimension = buffer.dimension().unwrap_or(0);
    for axis in 0..dimension {
        let Some(column) = buffer.column(axis) else {
            continue;
        };
        let mut kalman = ScalarKalmanFilter::from_config(config)?;
        let smoothed = kalman.filter_sequence(&column);
        for (sample, value) in buffer.samples.iter_mut().zip(smoothed) {
            sample[axis] = value;
        }
    }
    Ok(())
}
