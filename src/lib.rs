//! # groundtruth
//!
//! Ground truth trajectories for visual odometry and SLAM evaluation: read reference poses from
//! KITTI, TUM RGB-D, EuRoC or plain text datasets, time-align them with the camera frame stream,
//! and recover for any frame its timestamp, position and **absolute scale** (distance travelled
//! since the previous frame).
//!
//! Modules
//! -----------------
//! * [`records`] – Dataset readers producing index-addressable [`RecordSet`]s.
//! * [`association`] – Greedy nearest-timestamp matching and its JSON sidecar cache.
//! * [`groundtruth`] – The [`GroundTruth`] façade: frame resolution, scale reconstruction,
//!   trajectory extraction and export.
//! * [`settings`] – [`GroundTruthSettings`] and its builder.
//! * [`constants`] – Defaults, file names and type aliases.
//! * [`groundtruth_errors`] – The crate error type [`GroundTruthError`].
//!
//! Quick-Start
//! -----------------
//! ```rust,no_run
//! use groundtruth::{GroundTruth, GroundTruthKind, GroundTruthSettings};
//!
//! # fn run() -> Result<(), groundtruth::GroundTruthError> {
//! let settings = GroundTruthSettings::builder(GroundTruthKind::Tum, "/data/tum")
//!     .name("rgbd_dataset_freiburg1_xyz")
//!     .associations("associations.txt")
//!     .build()?;
//! let gt = GroundTruth::new(settings)?;
//!
//! let pose = gt.reconstruct(10)?;
//! let nearest = gt.closest_timestamp(pose.timestamp + 0.01);
//! # Ok(()) }
//! ```
pub mod association;
pub mod constants;
pub mod groundtruth;
pub mod groundtruth_errors;
pub mod records;
pub mod settings;

pub use association::{associate, Association, AssociationEntry, AssociationMap, EntryLayout};
pub use groundtruth::{ExtractionReport, GroundTruth, ScaledPose, Trajectory};
pub use groundtruth_errors::GroundTruthError;
pub use records::{PoseLayout, RecordSet, TimestampedRecord};
pub use settings::{GroundTruthKind, GroundTruthSettings};
