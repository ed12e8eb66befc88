//! Export to the Simple ground truth format.
//!
//! One line per resolvable sample, `timestamp x y z scale` with six decimals. The scale of a line
//! is the distance to the position on the previous line; the first line carries a scale of `1`.
//! Files written here can be read back as a
//! [`GroundTruthKind::Simple`](crate::settings::GroundTruthKind::Simple) source.
use std::{
    fs::File,
    io::{BufWriter, Write},
};

use camino::Utf8Path;
use tracing::{debug, info};

use super::{ExtractionReport, GroundTruth};
use crate::{constants::Position, groundtruth_errors::GroundTruthError};

impl GroundTruth {
    /// Write every resolvable sample to `writer` in the Simple format.
    ///
    /// Frames that cannot be resolved (no association, no record, malformed coordinate) are left
    /// out and listed in the returned report, as [`GroundTruth::full_trajectory`] does. Only
    /// write errors abort the export.
    ///
    /// Return
    /// ----------
    /// * An [`ExtractionReport`] whose `skipped` lists the frames left out.
    pub fn write_simple_xyz_to<W: Write>(
        &self,
        writer: &mut W,
    ) -> Result<ExtractionReport, GroundTruthError> {
        let mut report = ExtractionReport::default();
        let mut previous: Option<Position> = None;

        for frame_id in 0..self.num_samples() {
            let (timestamp, position) = match self.time_and_position(frame_id) {
                Ok(sample) => sample,
                Err(err) => {
                    debug!(frame_id, %err, "not exported");
                    report.skipped.push(frame_id);
                    continue;
                }
            };
            let scale = previous.map_or(1.0, |p| (position - p).norm());
            writeln!(
                writer,
                "{:.6} {:.6} {:.6} {:.6} {:.6}",
                timestamp, position.x, position.y, position.z, scale
            )?;
            previous = Some(position);
        }
        Ok(report)
    }

    /// Write every resolvable sample to the file at `path`, creating or truncating it.
    pub fn write_simple_xyz(&self, path: &Utf8Path) -> Result<ExtractionReport, GroundTruthError> {
        let mut writer = BufWriter::new(File::create(path)?);
        let report = self.write_simple_xyz_to(&mut writer)?;
        writer.flush()?;
        info!(
            samples = self.num_samples() - report.skipped.len(),
            skipped = report.skipped.len(),
            path = %path,
            "ground truth exported"
        );
        Ok(report)
    }
}
