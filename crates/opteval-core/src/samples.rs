//! Binary sample vectors.
//!
//! A sample file is a dense sequence of 12-byte little-endian records: a
//! `u32` memory figure followed by `f32` objective and `f32` time.

use crate::stats::{mean, median};
use crate::AnalysisError;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// Size of one encoded record in bytes.
pub const RECORD_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleRecord {
    pub memory: u32,
    pub objective: f32,
    pub time: f32,
}

impl SampleRecord {
    fn decode(bytes: &[u8]) -> Self {
        let word = |offset: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[offset..offset + 4]);
            raw
        };
        Self {
            memory: u32::from_le_bytes(word(0)),
            objective: f32::from_le_bytes(word(4)),
            time: f32::from_le_bytes(word(8)),
        }
    }

    pub fn field(&self, field: SampleField) -> f64 {
        match field {
            SampleField::Memory => f64::from(self.memory),
            SampleField::Objective => f64::from(self.objective),
            SampleField::Time => f64::from(self.time),
        }
    }
}

/// Decode a whole sample buffer.
///
/// # Errors
///
/// Fails with `SAMPLES_TRUNCATED` when the buffer ends inside a record.
pub fn parse_samples(bytes: &[u8]) -> Result<Vec<SampleRecord>, AnalysisError> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(AnalysisError::TruncatedSamples {
            len: bytes.len(),
            record_size: RECORD_SIZE,
        });
    }
    Ok(bytes
        .chunks_exact(RECORD_SIZE)
        .map(SampleRecord::decode)
        .collect())
}

pub fn read_sample_file(path: impl AsRef<Path>) -> Result<Vec<SampleRecord>, AnalysisError> {
    let bytes = std::fs::read(path.as_ref())?;
    let records = parse_samples(&bytes)?;
    tracing::debug!(
        component = "samples",
        operation = "read",
        status = "success",
        path = %path.as_ref().display(),
        records = records.len(),
        "Read {} samples",
        records.len()
    );
    Ok(records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Memory,
    Objective,
    Time,
}

impl SampleField {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleField::Memory => "memory",
            SampleField::Objective => "objective",
            SampleField::Time => "time",
        }
    }
}

impl FromStr for SampleField {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(SampleField::Memory),
            "objective" => Ok(SampleField::Objective),
            "time" => Ok(SampleField::Time),
            other => Err(AnalysisError::invalid_filter(
                "field",
                format!("unknown sample field '{other}'"),
            )),
        }
    }
}

/// One field of a sample vector with its minimum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    pub values: Vec<f64>,
    pub minimum: f64,
    /// Zero-based position of the first minimum.
    pub min_index: usize,
    pub median: f64,
}

/// Extract `field` from every record.
///
/// # Errors
///
/// Fails with `DATASET_EMPTY` on an empty vector.
pub fn sample_series(records: &[SampleRecord], field: SampleField) -> Result<SampleSeries, AnalysisError> {
    let values: Vec<f64> = records.iter().map(|record| record.field(field)).collect();
    let mut min_index = 0;
    for (idx, value) in values.iter().enumerate() {
        if *value < values[min_index] {
            min_index = idx;
        }
    }
    let median = median(&values)?;
    Ok(SampleSeries {
        minimum: values[min_index],
        min_index,
        median,
        values,
    })
}

/// Minima of one field across several sample vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub vectors: usize,
    pub mean_minimum: f64,
    pub median_minimum: f64,
    /// Mean of the zero-based minimum positions.
    pub mean_min_index: f64,
    pub median_min_index: f64,
    /// Mean vector length.
    pub mean_length: f64,
}

/// Summarize where and how low `field` bottoms out in each vector.
///
/// # Errors
///
/// Fails with `DATASET_EMPTY` when no vectors are given or one is empty.
pub fn sample_summary<V>(vectors: &[V], field: SampleField) -> Result<SampleSummary, AnalysisError>
where
    V: AsRef<[SampleRecord]>,
{
    if vectors.is_empty() {
        return Err(AnalysisError::EmptyDataset("sample vectors"));
    }

    let mut minimums = Vec::with_capacity(vectors.len());
    let mut indices = Vec::with_capacity(vectors.len());
    let mut lengths = Vec::with_capacity(vectors.len());
    for records in vectors {
        let series = sample_series(records.as_ref(), field)?;
        minimums.push(series.minimum);
        indices.push(series.min_index as f64);
        lengths.push(series.values.len() as f64);
    }

    Ok(SampleSummary {
        vectors: vectors.len(),
        mean_minimum: mean(&minimums)?,
        median_minimum: median(&minimums)?,
        mean_min_index: mean(&indices)?,
        median_min_index: median(&indices)?,
        mean_length: mean(&lengths)?,
    })
}
