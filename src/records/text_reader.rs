//! # Whitespace-delimited record readers
//!
//! Readers for line-oriented text files where each non-blank line is a sequence of
//! whitespace-separated tokens:
//!
//! - `timestamp x y z ...` files (Simple ground truth, TUM `groundtruth.txt`, EuRoC `data.tum`,
//!   TUM association lists) → [`read_whitespace_records`].
//! - KITTI pose files (12 tokens per line, no timestamp) paired with their `times.txt`
//!   → [`read_kitti_records`].
//!
//! Timestamps are parsed eagerly and a malformed timestamp aborts the read with
//! [`GroundTruthError::ParseError`]. All other tokens are kept verbatim.
use camino::Utf8Path;
use tracing::warn;

use super::{ensure_exists, ParseLineError, PoseLayout, RecordSet, TimestampedRecord};
use crate::groundtruth_errors::GroundTruthError;

fn parse_timestamp(path: &Utf8Path, line: usize, token: &str) -> Result<f64, GroundTruthError> {
    token
        .parse::<f64>()
        .map_err(|_| GroundTruthError::ParseError {
            path: path.to_string(),
            line,
            reason: ParseLineError::InvalidTimestamp(token.to_string()),
        })
}

/// Read a whitespace-delimited file whose first token on each line is a timestamp in seconds.
///
/// Arguments
/// -----------------
/// * `path` – File to read.
/// * `skip_lines` – Number of leading lines to drop before parsing (e.g. the three comment lines
///   of a TUM `groundtruth.txt`).
///
/// Return
/// ----------
/// * A [`RecordSet`] with one record per non-blank line, in file order.
///
/// Errors
/// ----------
/// * [`GroundTruthError::NotFound`] if the file does not exist.
/// * [`GroundTruthError::ParseError`] if a timestamp token is not a float. Line numbers are
///   1-based and count skipped lines.
pub fn read_whitespace_records(
    path: &Utf8Path,
    skip_lines: usize,
) -> Result<RecordSet, GroundTruthError> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;

    let mut records = Vec::new();
    for (line_idx, line) in content.lines().enumerate().skip(skip_lines) {
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some(first) = fields.first() else {
            continue;
        };
        let timestamp = parse_timestamp(path, line_idx + 1, first)?;
        records.push(TimestampedRecord::new(timestamp, fields));
    }

    Ok(RecordSet::new(Some(path.to_path_buf()), records))
}

/// Read a KITTI pose file and its timestamp file into a single record set.
///
/// Each pose line must hold the 12 tokens of a row-major `[R|t]` matrix; the record timestamp is
/// taken from the line with the same index in `times_path`. If the two files disagree in length,
/// the extra lines of the longer one are dropped and a warning is logged.
pub fn read_kitti_records(
    poses_path: &Utf8Path,
    times_path: &Utf8Path,
) -> Result<RecordSet, GroundTruthError> {
    ensure_exists(poses_path)?;
    ensure_exists(times_path)?;

    let expected = PoseLayout::KITTI_MATRIX.min_fields();
    let poses = std::fs::read_to_string(poses_path)?;
    let times = std::fs::read_to_string(times_path)?;

    let pose_lines: Vec<(usize, Vec<String>)> = poses
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let fields = line.split_whitespace().map(str::to_string).collect::<Vec<_>>();
            (i + 1, fields)
        })
        .filter(|(_, fields)| !fields.is_empty())
        .collect();

    let timestamps = times
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_timestamp(times_path, i + 1, line.trim()))
        .collect::<Result<Vec<f64>, _>>()?;

    if pose_lines.len() != timestamps.len() {
        warn!(
            poses = pose_lines.len(),
            times = timestamps.len(),
            "KITTI poses and times have different lengths, truncating to the shortest"
        );
    }

    let records = pose_lines
        .into_iter()
        .zip(timestamps)
        .map(|((line, fields), timestamp)| {
            if fields.len() < expected {
                return Err(GroundTruthError::ParseError {
                    path: poses_path.to_string(),
                    line,
                    reason: ParseLineError::TooFewFields {
                        expected,
                        found: fields.len(),
                    },
                });
            }
            Ok(TimestampedRecord::new(timestamp, fields))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordSet::new(Some(poses_path.to_path_buf()), records))
}
