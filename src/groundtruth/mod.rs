//! # Ground truth: frame resolution and absolute scale
//!
//! [`GroundTruth`] is the façade over one dataset's reference trajectory. It owns:
//!
//! 1. The **ground truth records** ([`RecordSet`]) and the [`PoseLayout`] telling where the
//!    coordinates live in each record.
//! 2. For associated formats (TUM, EuRoC), the **frame stream** and the immutable
//!    [`AssociationMap`] from frame index to ground truth index, loaded from or persisted to a
//!    sidecar on construction.
//! 3. A lazily built [`Trajectory`] cache used by
//!    [`closest_timestamp`](GroundTruth::closest_timestamp).
//!
//! ## Frame resolution
//! -----------------
//! A frame id requested by the caller is shifted by `start_frame_offset`, then:
//! * **direct** formats (Simple, KITTI) index the records with it,
//! * **associated** formats look it up in the association map and follow the entry.
//!
//! ## Absolute scale
//! -----------------
//! [`GroundTruth::reconstruct`] reads the resolved record and its predecessor and returns the
//! timestamp, the scaled position and the Euclidean distance between the two positions.
//!
//! The first sample of a dataset (absolute index 0) has no predecessor. `reconstruct` reports it
//! as [`GroundTruthError::OutOfRange`]; a caller that needs that sample reads it with
//! [`GroundTruth::time_and_position`] and uses `1` as its scale, as
//! [`write_simple_xyz`](GroundTruth::write_simple_xyz) does.
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use groundtruth::{GroundTruth, GroundTruthKind, GroundTruthSettings};
//!
//! # fn run() -> Result<(), groundtruth::GroundTruthError> {
//! let settings = GroundTruthSettings::builder(GroundTruthKind::Euroc, "/data/euroc")
//!     .name("MH_01_easy")
//!     .build()?;
//! let gt = GroundTruth::new(settings)?;
//!
//! let pose = gt.reconstruct(42)?;
//! println!("t={} scale={}", pose.timestamp, pose.abs_scale);
//!
//! let (trajectory, report) = gt.full_trajectory();
//! println!("{} samples, {} skipped", trajectory.len(), report.skipped.len());
//! # Ok(()) }
//! ```
use once_cell::unsync::OnceCell;
use tracing::info;

use crate::{
    association::AssociationMap,
    constants::{FrameId, Position, Seconds},
    groundtruth_errors::GroundTruthError,
    records::{PoseLayout, RecordSet, TimestampedRecord},
    settings::{GroundTruthKind, GroundTruthSettings},
};

mod export;
mod sources;
pub mod trajectory;

pub use trajectory::{ExtractionReport, Trajectory};

/// Timestamp, position and inter-frame displacement of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPose {
    pub timestamp: Seconds,
    pub position: Position,
    /// Distance to the previous frame's position. Not cumulative.
    pub abs_scale: f64,
}

impl ScaledPose {
    /// Value returned for every frame when no ground truth is configured.
    pub fn placeholder() -> Self {
        ScaledPose {
            timestamp: 1.0,
            position: Position::zeros(),
            abs_scale: 1.0,
        }
    }
}

/// Frame-indexed access to a ground truth trajectory.
#[derive(Debug)]
pub struct GroundTruth {
    settings: GroundTruthSettings,
    records: RecordSet,
    layout: PoseLayout,
    frames: Option<RecordSet>,
    associations: Option<AssociationMap>,
    trajectory: OnceCell<Trajectory>,
}

impl GroundTruth {
    /// Open the dataset described by `settings`.
    ///
    /// Reads the ground truth files for the configured kind and, for TUM and EuRoC, loads the
    /// association sidecar or computes and writes it.
    ///
    /// Errors
    /// ----------
    /// * [`GroundTruthError::InvalidSetting`] if `settings` fail validation.
    /// * [`GroundTruthError::NotFound`] if a required file is missing.
    /// * [`GroundTruthError::ParseError`] / [`GroundTruthError::EmptySource`] on malformed files.
    /// * [`GroundTruthError::CacheCorrupted`] if an existing sidecar cannot be parsed.
    pub fn new(settings: GroundTruthSettings) -> Result<Self, GroundTruthError> {
        settings.validate()?;
        info!(kind = ?settings.kind, base_path = %settings.base_path, "using groundtruth");

        let opened = sources::open(&settings)?;
        Ok(GroundTruth {
            settings,
            records: opened.records,
            layout: opened.layout,
            frames: opened.frames,
            associations: opened.associations,
            trajectory: OnceCell::new(),
        })
    }

    /// Build a ground truth from records already in memory.
    ///
    /// Arguments
    /// -----------------
    /// * `settings` – Offsets and scale to apply; paths are ignored.
    /// * `records` – Ground truth records.
    /// * `layout` – Coordinate token indices inside `records`.
    /// * `associated` – For associated access, the frame stream and the map from frame index to
    ///   record index. `None` for direct indexing.
    pub fn from_records(
        settings: GroundTruthSettings,
        records: RecordSet,
        layout: PoseLayout,
        associated: Option<(RecordSet, AssociationMap)>,
    ) -> Self {
        let (frames, associations) = associated.unzip();
        GroundTruth {
            settings,
            records,
            layout,
            frames,
            associations,
            trajectory: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> GroundTruthKind {
        self.settings.kind
    }

    pub fn settings(&self) -> &GroundTruthSettings {
        &self.settings
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn frames(&self) -> Option<&RecordSet> {
        self.frames.as_ref()
    }

    pub fn associations(&self) -> Option<&AssociationMap> {
        self.associations.as_ref()
    }

    /// Number of addressable frame ids.
    ///
    /// Samples are the frames of associated formats and the records otherwise; the first
    /// `start_frame_offset` of them are not addressable, so valid frame ids are
    /// `0 .. num_samples()`.
    pub fn num_samples(&self) -> usize {
        let total = match self.settings.kind {
            GroundTruthKind::None => 0,
            kind if kind.is_associated() => self.frames.as_ref().map_or(0, RecordSet::len),
            _ => self.records.len(),
        };
        total.saturating_sub(self.settings.start_frame_offset)
    }

    fn absolute_index(&self, frame_id: FrameId) -> usize {
        frame_id + self.settings.start_frame_offset
    }

    /// Record at an absolute (already offset) index, following the association map if any.
    ///
    /// Returns the record together with its index in [`GroundTruth::records`].
    fn record_at(&self, index: usize) -> Result<(usize, &TimestampedRecord), GroundTruthError> {
        let record_index = match &self.associations {
            Some(map) => {
                map.get(index)
                    .ok_or(GroundTruthError::AssociationGap(index))?
                    .secondary_index
            }
            None => index,
        };
        let record = self
            .records
            .get(record_index)
            .ok_or(GroundTruthError::OutOfRange(record_index))?;
        Ok((record_index, record))
    }

    fn position_at(&self, index: usize) -> Result<(Seconds, Position), GroundTruthError> {
        let (record_index, record) = self.record_at(index)?;
        let position =
            self.layout
                .position(record, record_index, self.settings.effective_scale())?;
        Ok((record.timestamp, position))
    }

    /// Resolve a frame id to its ground truth record.
    ///
    /// Errors
    /// ----------
    /// * [`GroundTruthError::AssociationGap`] if the frame has no association.
    /// * [`GroundTruthError::OutOfRange`] if the resolved index has no record.
    pub fn resolve(&self, frame_id: FrameId) -> Result<&TimestampedRecord, GroundTruthError> {
        self.record_at(self.absolute_index(frame_id))
            .map(|(_, record)| record)
    }

    /// Timestamp and scaled position of a frame, without reading its predecessor.
    pub fn time_and_position(
        &self,
        frame_id: FrameId,
    ) -> Result<(Seconds, Position), GroundTruthError> {
        if self.settings.kind == GroundTruthKind::None {
            let p = ScaledPose::placeholder();
            return Ok((p.timestamp, p.position));
        }
        self.position_at(self.absolute_index(frame_id))
    }

    /// Timestamp, scaled position and absolute scale of a frame.
    ///
    /// The absolute scale is `‖p(frame_id) − p(frame_id − 1)‖` with both positions resolved
    /// through the same offset and association rules.
    ///
    /// Boundary
    /// -----------------
    /// The frame at absolute index 0 (frame id 0 with no start offset) has no predecessor and
    /// yields [`GroundTruthError::OutOfRange`]`(0)`. Use [`GroundTruth::time_and_position`] for
    /// that frame and take `1` as its scale.
    ///
    /// With no ground truth configured, every frame returns [`ScaledPose::placeholder`].
    pub fn reconstruct(&self, frame_id: FrameId) -> Result<ScaledPose, GroundTruthError> {
        if self.settings.kind == GroundTruthKind::None {
            return Ok(ScaledPose::placeholder());
        }

        let index = self.absolute_index(frame_id);
        let (timestamp, position) = self.position_at(index)?;

        let previous = index
            .checked_sub(1)
            .ok_or(GroundTruthError::OutOfRange(index))?;
        let (_, previous_position) = self.position_at(previous)?;

        Ok(ScaledPose {
            timestamp,
            position,
            abs_scale: (position - previous_position).norm(),
        })
    }
}
