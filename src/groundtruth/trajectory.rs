//! # Full trajectory extraction
//!
//! Batch reconstruction of every interior sample of a [`GroundTruth`] into a [`Trajectory`]:
//! parallel sequences of positions and timestamps, in frame order.
//!
//! ## Range
//! -----------------
//! Frame ids `1 ..= num_samples − 2` are visited; the first sample has no predecessor and the
//! last one is left out of the window.
//!
//! ## Failure policy
//! -----------------
//! A frame that cannot be resolved (association gap, out-of-range index, malformed coordinate)
//! is skipped and recorded in the [`ExtractionReport`]; extraction always runs to the end. When
//! only the predecessor of a frame is missing, the frame itself is still usable: its timestamp and
//! position are kept and the frame is listed in [`ExtractionReport::without_predecessor`].
use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::debug;

use super::GroundTruth;
use crate::constants::{FrameId, Position, Seconds};

/// Ordered positions with their timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub positions: Vec<Position>,
    pub timestamps: Vec<Seconds>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn push(&mut self, timestamp: Seconds, position: Position) {
        self.timestamps.push(timestamp);
        self.positions.push(position);
    }

    /// Iterate over `(timestamp, position)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seconds, &Position)> {
        self.timestamps.iter().copied().zip(self.positions.iter())
    }

    /// Timestamp closest to `query`; the first one wins on ties. `None` if empty.
    pub fn closest_timestamp(&self, query: Seconds) -> Option<Seconds> {
        self.timestamps
            .iter()
            .position_min_by_key(|&&t| OrderedFloat((t - query).abs()))
            .map(|i| self.timestamps[i])
    }
}

/// Frames that did not make it, or only partially, into an extracted [`Trajectory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Frames dropped because they could not be resolved.
    pub skipped: Vec<FrameId>,
    /// Frames kept although their predecessor could not be resolved.
    pub without_predecessor: Vec<FrameId>,
}

impl GroundTruth {
    /// Reconstruct every interior frame into a [`Trajectory`].
    ///
    /// Each call recomputes the trajectory from the records; the result does not depend on
    /// earlier calls.
    ///
    /// Return
    /// ----------
    /// * The trajectory and an [`ExtractionReport`] listing skipped frames.
    pub fn full_trajectory(&self) -> (Trajectory, ExtractionReport) {
        let mut trajectory = Trajectory::default();
        let mut report = ExtractionReport::default();

        for frame_id in 1..self.num_samples().saturating_sub(1) {
            match self.reconstruct(frame_id) {
                Ok(pose) => trajectory.push(pose.timestamp, pose.position),
                Err(err) => match self.time_and_position(frame_id) {
                    Ok((timestamp, position)) => {
                        debug!(frame_id, %err, "no predecessor, keeping sample without scale");
                        trajectory.push(timestamp, position);
                        report.without_predecessor.push(frame_id);
                    }
                    Err(_) => {
                        debug!(frame_id, %err, "skipping sample");
                        report.skipped.push(frame_id);
                    }
                },
            }
        }

        (trajectory, report)
    }

    /// The cached trajectory, extracted on first access.
    pub fn trajectory(&self) -> &Trajectory {
        self.trajectory.get_or_init(|| self.full_trajectory().0)
    }

    /// Ground truth timestamp closest to `query`.
    ///
    /// Builds and caches the full trajectory on first use. Ties resolve to the earliest sample;
    /// `None` if the trajectory is empty.
    pub fn closest_timestamp(&self, query: Seconds) -> Option<Seconds> {
        self.trajectory().closest_timestamp(query)
    }
}

#[cfg(test)]
mod trajectory_test {
    use super::*;
    use crate::{
        association::{AssociationEntry, AssociationMap},
        records::{PoseLayout, RecordSet, TimestampedRecord},
        settings::{GroundTruthKind, GroundTruthSettings},
    };

    fn records(n: usize) -> RecordSet {
        (0..n)
            .map(|i| {
                let t = i as f64 * 0.1;
                TimestampedRecord::new(
                    t,
                    vec![t.to_string(), i.to_string(), "0".into(), "0".into()],
                )
            })
            .collect()
    }

    fn associated(n: usize, without: Option<usize>) -> GroundTruth {
        let map: AssociationMap = (0..n)
            .filter(|i| Some(*i) != without)
            .map(|i| (i, AssociationEntry::compact(i, 0.0)))
            .collect();
        let settings = GroundTruthSettings::builder(GroundTruthKind::Euroc, "")
            .name("seq")
            .build()
            .unwrap();
        let frames = RecordSet::from_timestamps(&vec![0.0; n]);
        GroundTruth::from_records(
            settings,
            records(n),
            PoseLayout::TIMESTAMP_XYZ,
            Some((frames, map)),
        )
    }

    #[test]
    fn test_interior_range() {
        let gt = associated(6, None);
        let (traj, report) = gt.full_trajectory();

        assert_eq!(traj.len(), 4);
        assert_eq!(traj.positions.len(), traj.timestamps.len());
        assert_eq!(traj.positions[0], Position::new(1.0, 0.0, 0.0));
        assert_eq!(traj.positions[3], Position::new(4.0, 0.0, 0.0));
        assert_eq!(report, ExtractionReport::default());
    }

    #[test]
    fn test_missing_association_drops_one_sample() {
        let full = associated(8, None).full_trajectory().0;
        let (traj, report) = associated(8, Some(3)).full_trajectory();

        assert_eq!(traj.len(), full.len() - 1);
        assert_eq!(report.skipped, vec![3]);
        assert_eq!(report.without_predecessor, vec![4]);
        assert!(!traj.positions.contains(&Position::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_start_offset_stays_inside_records() {
        let settings = GroundTruthSettings::builder(GroundTruthKind::Simple, "")
            .groundtruth_file("groundtruth.txt")
            .start_frame_offset(2)
            .build()
            .unwrap();
        let gt = GroundTruth::from_records(settings, records(6), PoseLayout::TIMESTAMP_XYZ, None);
        let (traj, report) = gt.full_trajectory();

        assert_eq!(gt.num_samples(), 4);
        assert_eq!(report, ExtractionReport::default());
        assert_eq!(
            traj.positions,
            vec![Position::new(3.0, 0.0, 0.0), Position::new(4.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_restartable() {
        let gt = associated(5, Some(2));
        assert_eq!(gt.full_trajectory(), gt.full_trajectory());
    }

    #[test]
    fn test_too_few_samples() {
        for n in 0..3 {
            let (traj, report) = associated(n, None).full_trajectory();
            assert!(traj.is_empty());
            assert!(report.skipped.is_empty());
        }
    }

    #[test]
    fn test_closest_timestamp() {
        let traj = Trajectory {
            positions: vec![Position::zeros(); 4],
            timestamps: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(traj.closest_timestamp(2.2), Some(2.0));
        assert_eq!(traj.closest_timestamp(-10.0), Some(1.0));
        assert_eq!(traj.closest_timestamp(100.0), Some(4.0));
        // tie between 2.0 and 3.0
        assert_eq!(traj.closest_timestamp(2.5), Some(2.0));
        assert_eq!(Trajectory::default().closest_timestamp(0.0), None);
    }

    #[test]
    fn test_closest_timestamp_uses_cached_trajectory() {
        let gt = associated(6, None);
        // interior samples are 0.1 ..= 0.4
        assert_eq!(gt.closest_timestamp(0.0), Some(0.1));
        assert_eq!(gt.closest_timestamp(0.33), Some(0.30000000000000004));
        assert!(std::ptr::eq(gt.trajectory(), gt.trajectory()));
    }
}
