//! Deterministic synthetic recorder sessions.
//!
//! Each axis is `bias + drift * t + amplitude * sin(2 pi f t) + noise`, with
//! uniform noise and timestamp jitter drawn from a seeded `StdRng`, so the same
//! spec always produces the same log.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::imu::record::{ImuRecord, ImuSample, VideoStartMarker};
use crate::imu::session::ImuLog;

/// Signal model for one simulated sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSensor {
    pub name: String,
    pub rate_hz: f64,
    /// Constant offset per axis
    pub bias: Vec<f64>,
    /// Linear drift per axis, units per second
    pub drift_per_s: Vec<f64>,
    #[serde(default = "default_tone_hz")]
    pub tone_hz: f64,
    #[serde(default = "default_tone_amplitude")]
    pub tone_amplitude: f64,
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
}

/// Session made of several sensors recorded side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticImu {
    pub sensors: Vec<SyntheticSensor>,
    pub duration_s: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Maximum absolute timestamp jitter
    #[serde(default)]
    pub jitter_ns: i64,
    /// Start time of the first sample
    #[serde(default = "default_start_ns")]
    pub start_ns: i64,
    /// Camera start relative to `start_ns`; adds a marker line when set
    #[serde(default)]
    pub video_offset_ns: Option<i64>,
}

fn default_tone_hz() -> f64 {
    2.0
}

fn default_tone_amplitude() -> f64 {
    0.5
}

fn default_noise_amplitude() -> f64 {
    0.05
}

fn default_seed() -> u64 {
    0x1A0_F117
}

fn default_start_ns() -> i64 {
    1_000_000_000
}

impl SyntheticSensor {
    pub fn new(
        name: impl Into<String>,
        rate_hz: f64,
        bias: Vec<f64>,
        drift_per_s: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            rate_hz,
            bias,
            drift_per_s,
            tone_hz: default_tone_hz(),
            tone_amplitude: default_tone_amplitude(),
            noise_amplitude: default_noise_amplitude(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.bias.len()
    }
}

impl SyntheticImu {
    /// Phone-like session: 3-axis linear accelerometer and gyroscope
    pub fn phone(duration_s: f64) -> Self {
        Self {
            sensors: vec![
                SyntheticSensor::new(
                    "Synthetic Linear Acceleration",
                    100.0,
                    vec![0.12, -0.08, 0.25],
                    vec![0.01, 0.0, -0.02],
                ),
                SyntheticSensor::new(
                    "Synthetic 3-axis Gyroscope",
                    200.0,
                    vec![0.005, -0.003, 0.002],
                    vec![0.0005, 0.0005, 0.0],
                ),
            ],
            duration_s,
            seed: default_seed(),
            jitter_ns: 200_000,
            start_ns: default_start_ns(),
            video_offset_ns: Some(35_000_000),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the session, records sorted by timestamp
    ///
    /// First samples are not jittered, so sensors appear in declaration order.
    pub fn generate(&self) -> ImuLog {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records: Vec<ImuRecord> = Vec::new();

        for sensor in &self.sensors {
            if sensor.rate_hz <= 0.0 || self.duration_s <= 0.0 {
                continue;
            }
            let count = (self.duration_s * sensor.rate_hz).floor() as usize;
            let period_ns = 1e9 / sensor.rate_hz;

            for i in 0..count {
                let t = i as f64 / sensor.rate_hz;
                let jitter = if self.jitter_ns > 0 && i > 0 {
                    rng.gen_range(-self.jitter_ns..=self.jitter_ns)
                } else {
                    0
                };
                let tone = sensor.tone_amplitude * (2.0 * PI * sensor.tone_hz * t).sin();

                let values = sensor
                    .bias
                    .iter()
                    .enumerate()
                    .map(|(axis, bias)| {
                        let drift = sensor.drift_per_s.get(axis).copied().unwrap_or(0.0);
                        let noise = if sensor.noise_amplitude > 0.0 {
                            rng.gen_range(-sensor.noise_amplitude..sensor.noise_amplitude)
                        } else {
                            0.0
                        };
                        bias + drift * t + tone + noise
                    })
                    .collect();

                records.push(ImuRecord::Sample(ImuSample {
                    timestamp_ns: self.start_ns + (i as f64 * period_ns).round() as i64 + jitter,
                    sensor: sensor.name.clone(),
                    values,
                }));
            }
        }

        if let Some(offset) = self.video_offset_ns {
            records.push(ImuRecord::VideoStart(VideoStartMarker {
                timestamp_ns: self.start_ns + offset,
                latency_ns: -offset,
            }));
        }

        records.sort_by_key(ImuRecord::timestamp_ns);
        ImuLog::new(records)
    }
}
