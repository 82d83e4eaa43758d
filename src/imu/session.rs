// ImuLog - an entire recorder session held in memory

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::ImuLogError;
use crate::imu::record::{parse_line, ImuRecord, ImuSample, VideoStartMarker};
use crate::imu::stream::SensorStream;

/// Ordered records of one recording session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuLog {
    pub records: Vec<ImuRecord>,
}

impl ImuLog {
    pub fn new(records: Vec<ImuRecord>) -> Self {
        Self { records }
    }

    /// Parse a full log, reporting the first bad line
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ImuLogError> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| match err.kind() {
                io::ErrorKind::InvalidData => ImuLogError::MalformedLine {
                    line: index + 1,
                    reason: "line is not valid UTF-8".to_string(),
                },
                _ => err.into(),
            })?;
            if let Some(record) = parse_line(&line, index + 1)? {
                records.push(record);
            }
        }
        Ok(Self { records })
    }

    pub fn parse_str(contents: &str) -> Result<Self, ImuLogError> {
        Self::parse(contents.as_bytes())
    }

    /// Write the log back in the recorder's line format
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ImuLogError> {
        for record in &self.records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn samples(&self) -> impl Iterator<Item = &ImuSample> {
        self.records.iter().filter_map(|record| match record {
            ImuRecord::Sample(sample) => Some(sample),
            ImuRecord::VideoStart(_) => None,
        })
    }

    pub fn video_start(&self) -> Option<VideoStartMarker> {
        self.records.iter().find_map(|record| match record {
            ImuRecord::VideoStart(marker) => Some(*marker),
            ImuRecord::Sample(_) => None,
        })
    }

    /// Group samples by sensor, in order of first appearance
    ///
    /// # Errors
    /// `EmptyLog` when there are no samples, `InconsistentDimension` when a
    /// sensor changes vector length mid-session.
    pub fn streams(&self) -> Result<Vec<SensorStream>, ImuLogError> {
        let mut streams: Vec<SensorStream> = Vec::new();
        let mut index_by_sensor: HashMap<&str, usize> = HashMap::new();

        for sample in self.samples() {
            let index = *index_by_sensor
                .entry(sample.sensor.as_str())
                .or_insert_with(|| {
                    streams.push(SensorStream::new(sample.sensor.clone()));
                    streams.len() - 1
                });
            streams[index].push(sample.timestamp_ns, sample.values.clone())?;
        }

        if streams.is_empty() {
            return Err(ImuLogError::EmptyLog);
        }
        Ok(streams)
    }

    /// Copy of this log with sample values taken from `streams`
    ///
    /// Values are consumed per sensor in recording order. Sensors missing
    /// from `streams`, and marker lines, are kept unchanged.
    pub fn with_streams(&self, streams: &[SensorStream]) -> Self {
        let by_sensor: HashMap<&str, &SensorStream> = streams
            .iter()
            .map(|stream| (stream.sensor.as_str(), stream))
            .collect();
        let mut cursor: HashMap<&str, usize> = HashMap::new();

        let records = self
            .records
            .iter()
            .map(|record| match record {
                ImuRecord::Sample(sample) => {
                    let Some(stream) = by_sensor.get(sample.sensor.as_str()) else {
                        return record.clone();
                    };
                    let position = cursor.entry(sample.sensor.as_str()).or_insert(0);
                    let values = stream
                        .values
                        .get(*position)
                        .cloned()
                        .unwrap_or_else(|| sample.values.clone());
                    *position += 1;
                    ImuRecord::Sample(ImuSample {
                        timestamp_ns: sample.timestamp_ns,
                        sensor: sample.sensor.clone(),
                        values,
                    })
                }
                ImuRecord::VideoStart(_) => record.clone(),
            })
            .collect();

        Self { records }
    }
}
