// Recorder log line codec
//
// The recorder appends one line per sensor event:
//
//   <nanos> <sensor name> [v0, v1, ..., vn]
//   1578699792815 Goldfish 3-axis Gyroscope [0.0, 0.0, 0.0]
//
// and one marker line once the camera reports its first frame:
//
//   <nanos> video recording started. Latency between IMU and camera: <abs nanos> (<IMU|camera> started sooner)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ImuLogError;

const VIDEO_START_PREFIX: &str = "video recording started.";
const LATENCY_LABEL: &str = "Latency between IMU and camera:";

/// One sensor event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    pub timestamp_ns: i64,
    pub sensor: String,
    pub values: Vec<f64>,
}

/// Video start marker with the IMU/camera start offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStartMarker {
    /// Camera start time
    pub timestamp_ns: i64,
    /// IMU start minus camera start; negative when the IMU started first
    pub latency_ns: i64,
}

impl VideoStartMarker {
    pub fn imu_started_first(&self) -> bool {
        self.latency_ns < 0
    }
}

/// A parsed log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImuRecord {
    Sample(ImuSample),
    VideoStart(VideoStartMarker),
}

impl ImuRecord {
    pub fn timestamp_ns(&self) -> i64 {
        match self {
            ImuRecord::Sample(sample) => sample.timestamp_ns,
            ImuRecord::VideoStart(marker) => marker.timestamp_ns,
        }
    }
}

impl fmt::Display for ImuRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImuRecord::Sample(sample) => {
                write!(f, "{} {} [", sample.timestamp_ns, sample.sensor)?;
                for (i, value) in sample.values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", value)?;
                }
                f.write_str("]")
            }
            ImuRecord::VideoStart(marker) => write!(
                f,
                "{} {} {} {} ({} started sooner)",
                marker.timestamp_ns,
                VIDEO_START_PREFIX,
                LATENCY_LABEL,
                marker.latency_ns.unsigned_abs(),
                if marker.imu_started_first() {
                    "IMU"
                } else {
                    "camera"
                }
            ),
        }
    }
}

/// Parse one log line
///
/// `line_number` is 1-based and only used for error reporting.
/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<ImuRecord>, ImuLogError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| ImuLogError::MalformedLine {
        line: line_number,
        reason,
    };

    let (timestamp, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed("expected '<nanos> <payload>'".to_string()))?;
    let timestamp_ns: i64 = timestamp
        .parse()
        .map_err(|_| malformed(format!("invalid timestamp '{}'", timestamp)))?;
    let rest = rest.trim_start();

    if let Some(tail) = rest.strip_prefix(VIDEO_START_PREFIX) {
        return parse_video_start(timestamp_ns, tail).map(Some).map_err(malformed);
    }

    let open = rest
        .rfind('[')
        .filter(|_| rest.ends_with(']'))
        .ok_or_else(|| malformed("missing '[values]' list".to_string()))?;
    let sensor = rest[..open].trim();
    if sensor.is_empty() {
        return Err(malformed("missing sensor name".to_string()));
    }

    let values = rest[open + 1..rest.len() - 1]
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| malformed(format!("invalid value '{}'", v)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(malformed(format!("sensor '{}' reported no values", sensor)));
    }

    Ok(Some(ImuRecord::Sample(ImuSample {
        timestamp_ns,
        sensor: sensor.to_string(),
        values,
    })))
}

fn parse_video_start(timestamp_ns: i64, tail: &str) -> Result<ImuRecord, String> {
    let tail = tail
        .trim_start()
        .strip_prefix(LATENCY_LABEL)
        .ok_or_else(|| "missing latency in video start marker".to_string())?
        .trim();

    let (magnitude, origin) = tail
        .split_once(char::is_whitespace)
        .ok_or_else(|| "missing latency origin".to_string())?;
    let magnitude: i64 = magnitude
        .parse()
        .map_err(|_| format!("invalid latency '{}'", magnitude))?;

    let latency_ns = match origin.trim() {
        "(IMU started sooner)" => -magnitude,
        "(camera started sooner)" => magnitude,
        other => return Err(format!("unknown latency origin '{}'", other)),
    };

    Ok(ImuRecord::VideoStart(VideoStartMarker {
        timestamp_ns,
        latency_ns,
    }))
}
