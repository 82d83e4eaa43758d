// Per-sensor sample streams
//
// The recorder interleaves accelerometer and gyroscope events in one file.
// Filtering needs each sensor on its own, with an average sampling interval
// derived from its timestamps.

use serde::{Deserialize, Serialize};

use crate::error::ImuLogError;
use crate::filters::SampleBuffer;

const NANOS_PER_SECOND: f64 = 1e9;

/// Average spacing of nanosecond timestamps, in seconds
///
/// Returns 0.0 ("rate unknown") for fewer than two timestamps or when the
/// last timestamp is not after the first.
pub fn average_sample_interval(timestamps_ns: &[i64]) -> f64 {
    match (timestamps_ns.first(), timestamps_ns.last()) {
        (Some(&first), Some(&last)) if timestamps_ns.len() >= 2 && last > first => {
            (last - first) as f64 / NANOS_PER_SECOND / (timestamps_ns.len() - 1) as f64
        }
        _ => 0.0,
    }
}

/// All samples of one sensor in recording order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStream {
    pub sensor: String,
    pub timestamps_ns: Vec<i64>,
    pub values: Vec<Vec<f64>>,
}

impl SensorStream {
    pub fn new(sensor: impl Into<String>) -> Self {
        Self {
            sensor: sensor.into(),
            timestamps_ns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a sample, enforcing a constant vector length
    pub fn push(&mut self, timestamp_ns: i64, values: Vec<f64>) -> Result<(), ImuLogError> {
        if let Some(expected) = self.dimension() {
            if values.len() != expected {
                return Err(ImuLogError::InconsistentDimension {
                    sensor: self.sensor.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        self.timestamps_ns.push(timestamp_ns);
        self.values.push(values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.values.first().map(Vec::len)
    }

    pub fn avg_sample_interval(&self) -> f64 {
        average_sample_interval(&self.timestamps_ns)
    }

    /// Approximate sample rate in Hz, 0.0 when unknown
    pub fn sample_rate(&self) -> f64 {
        let interval = self.avg_sample_interval();
        if interval > 0.0 {
            1.0 / interval
        } else {
            0.0
        }
    }

    pub fn to_sample_buffer(&self) -> SampleBuffer {
        SampleBuffer::new(self.values.clone(), self.avg_sample_interval())
    }

    /// Same timestamps with values replaced by `buffer`'s samples
    pub fn with_values(&self, buffer: SampleBuffer) -> Self {
        Self {
            sensor: self.sensor.clone(),
            timestamps_ns: self.timestamps_ns.clone(),
            values: buffer.samples,
        }
    }
}
