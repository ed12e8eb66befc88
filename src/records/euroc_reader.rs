//! EuRoC camera table reader (`mav0/cam0/data.csv`).
//!
//! The file starts with a header row (`#timestamp [ns],filename`) followed by
//! `timestamp_ns,filename` rows. Timestamps are integer nanoseconds on disk and are converted to
//! seconds by dividing by 10⁹.
use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};

use super::{ensure_exists, ParseLineError, RecordSet, TimestampedRecord};
use crate::{constants::NANOS_PER_SECOND, groundtruth_errors::GroundTruthError};

/// Read a EuRoC camera table into a [`RecordSet`] of frame timestamps.
///
/// Each record keeps the raw CSV fields (`[timestamp_ns, filename]`); its timestamp is the
/// converted value in seconds.
pub fn read_euroc_frames(csv_path: &Utf8Path) -> Result<RecordSet, GroundTruthError> {
    ensure_exists(csv_path)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(csv_path)?;

    let mut records = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line() as usize).unwrap_or(0);
        let token = rec.get(0).unwrap_or_default();
        let timestamp_ns: u64 = token.parse().map_err(|_| GroundTruthError::ParseError {
            path: csv_path.to_string(),
            line,
            reason: ParseLineError::InvalidTimestamp(token.to_string()),
        })?;

        records.push(TimestampedRecord::new(
            timestamp_ns as f64 / NANOS_PER_SECOND,
            rec.iter().map(str::to_string).collect(),
        ));
    }

    Ok(RecordSet::new(Some(csv_path.to_path_buf()), records))
}
