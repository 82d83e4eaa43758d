//! Recorder IMU log ingestion.
//!
//! Parses the line-oriented log written next to each video, splits it into
//! per-sensor streams and writes filtered sessions back in the same format.

pub mod record;
pub mod session;
pub mod stream;
pub mod synthetic;

pub use record::{parse_line, ImuRecord, ImuSample, VideoStartMarker};
pub use session::ImuLog;
pub use stream::{average_sample_interval, SensorStream};
pub use synthetic::{SyntheticImu, SyntheticSensor};
