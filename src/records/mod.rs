//! # Records: timestamped ground truth and frame streams
//!
//! Index-addressable storage for the raw lines read from a dataset. Every supported format is
//! reduced to the same shape, a [`TimestampedRecord`] holding a timestamp in **seconds** and the
//! ordered tokens of its source line, stored in a [`RecordSet`] arena.
//!
//! Modules
//! -----------------
//! * [`text_reader`](crate::records::text_reader) – Whitespace-delimited readers (Simple, TUM,
//!   EuRoC `data.tum`, KITTI poses + times).
//! * [`euroc_reader`](crate::records::euroc_reader) – EuRoC camera tables (`cam0/data.csv`) with
//!   nanosecond timestamps.
//!
//! Positions
//! -----------------
//! Coordinates are kept as raw tokens and parsed on access through a [`PoseLayout`], which names
//! the token indices holding `x`, `y` and `z` for a given format. A malformed coordinate only
//! invalidates the sample that carries it, not the whole file.
use std::ops::Index;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::{
    constants::{Position, Seconds},
    groundtruth_errors::GroundTruthError,
};

pub mod euroc_reader;
pub mod text_reader;

/// Line-level parsing errors shared by the record readers.
#[derive(Error, Debug, PartialEq)]
pub enum ParseLineError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
}

/// Anything carrying a timestamp in seconds.
///
/// Implemented for [`TimestampedRecord`] and for bare `f64` so that the associator can be driven
/// directly from timestamp slices.
pub trait Timestamped {
    fn timestamp(&self) -> Seconds;
}

impl Timestamped for f64 {
    fn timestamp(&self) -> Seconds {
        *self
    }
}

/// One parsed line of a dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedRecord {
    pub timestamp: Seconds,
    pub fields: Vec<String>,
}

impl TimestampedRecord {
    pub fn new(timestamp: Seconds, fields: Vec<String>) -> Self {
        TimestampedRecord { timestamp, fields }
    }

    /// Parse the numeric token at `field`.
    ///
    /// Arguments
    /// -----------------
    /// * `field` – Token index inside [`TimestampedRecord::fields`].
    /// * `index` – Index of this record in its [`RecordSet`], used for error reporting.
    ///
    /// Return
    /// ----------
    /// * The parsed value, or [`GroundTruthError::InvalidNumber`] if the token is missing or not
    ///   a float.
    pub fn number(&self, field: usize, index: usize) -> Result<f64, GroundTruthError> {
        let token = self
            .fields
            .get(field)
            .ok_or_else(|| GroundTruthError::InvalidNumber {
                index,
                value: format!("<missing field {field}>"),
            })?;

        token
            .parse::<f64>()
            .map_err(|_| GroundTruthError::InvalidNumber {
                index,
                value: token.clone(),
            })
    }
}

impl Timestamped for TimestampedRecord {
    fn timestamp(&self) -> Seconds {
        self.timestamp
    }
}

/// Token indices of the `x`, `y`, `z` coordinates inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseLayout {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl PoseLayout {
    /// `timestamp x y z ...` lines (Simple, TUM, EuRoC `data.tum`).
    pub const TIMESTAMP_XYZ: PoseLayout = PoseLayout { x: 1, y: 2, z: 3 };

    /// Row-major 3×4 `[R|t]` matrices (KITTI poses).
    pub const KITTI_MATRIX: PoseLayout = PoseLayout { x: 3, y: 7, z: 11 };

    /// Number of tokens a record must carry for this layout.
    pub fn min_fields(&self) -> usize {
        self.x.max(self.y).max(self.z) + 1
    }

    /// Read the position of `record`, multiplied by `scale`.
    ///
    /// Arguments
    /// -----------------
    /// * `record` – The record to read.
    /// * `index` – Index of the record in its set (error reporting only).
    /// * `scale` – Scale factor applied uniformly to the three coordinates.
    pub fn position(
        &self,
        record: &TimestampedRecord,
        index: usize,
        scale: f64,
    ) -> Result<Position, GroundTruthError> {
        Ok(Position::new(
            scale * record.number(self.x, index)?,
            scale * record.number(self.y, index)?,
            scale * record.number(self.z, index)?,
        ))
    }
}

/// An ordered, index-addressable collection of records read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    source: Option<Utf8PathBuf>,
    records: Vec<TimestampedRecord>,
}

impl RecordSet {
    pub fn new(source: Option<Utf8PathBuf>, records: Vec<TimestampedRecord>) -> Self {
        RecordSet { source, records }
    }

    /// Build a set of field-less records from bare timestamps.
    pub fn from_timestamps(timestamps: &[Seconds]) -> Self {
        RecordSet {
            source: None,
            records: timestamps
                .iter()
                .map(|&t| TimestampedRecord::new(t, Vec::new()))
                .collect(),
        }
    }

    pub fn source(&self) -> Option<&Utf8Path> {
        self.source.as_deref()
    }

    pub fn get(&self, index: usize) -> Option<&TimestampedRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[TimestampedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimestampedRecord> {
        self.records.iter()
    }
}

impl Index<usize> for RecordSet {
    type Output = TimestampedRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl FromIterator<TimestampedRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = TimestampedRecord>>(iter: I) -> Self {
        RecordSet {
            source: None,
            records: iter.into_iter().collect(),
        }
    }
}

/// Return an error if `path` does not point to an existing file.
pub(crate) fn ensure_exists(path: &Utf8Path) -> Result<(), GroundTruthError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(GroundTruthError::NotFound(path.to_string()))
    }
}
