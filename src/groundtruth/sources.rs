//! Per-format dataset opening.
//!
//! Each supported [`GroundTruthKind`] lives at a fixed place under `base_path`:
//!
//! | Kind   | Ground truth                                              | Frames                       | Sidecar                |
//! |--------|-----------------------------------------------------------|------------------------------|------------------------|
//! | Simple | `<base>/<groundtruth_file>`                               | –                            | –                      |
//! | KITTI  | `<base>/poses/<name>.txt` + `<base>/sequences/<name>/times.txt` | –                      | –                      |
//! | TUM    | `<base>/<name>/groundtruth.txt` (3 comment lines)         | `<base>/<name>/<associations>` | `gt_associations.json` |
//! | EuRoC  | `<base>/<name>/mav0/state_groundtruth_estimate0/data.tum` | `<base>/<name>/mav0/cam0/data.csv` | `associations.json` |
//!
//! Sidecars are written next to the ground truth file.
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::{
    association::{associate, cache, AssociationMap, EntryLayout},
    constants::{EUROC_SIDECAR, TUM_COMMENT_LINES, TUM_SIDECAR},
    groundtruth_errors::GroundTruthError,
    records::{
        euroc_reader::read_euroc_frames,
        text_reader::{read_kitti_records, read_whitespace_records},
        PoseLayout, RecordSet,
    },
    settings::{GroundTruthKind, GroundTruthSettings},
};

/// Everything read from disk for one dataset.
pub(super) struct OpenedSource {
    pub records: RecordSet,
    pub layout: PoseLayout,
    pub frames: Option<RecordSet>,
    pub associations: Option<AssociationMap>,
}

impl OpenedSource {
    fn direct(records: RecordSet, layout: PoseLayout) -> Self {
        OpenedSource {
            records,
            layout,
            frames: None,
            associations: None,
        }
    }
}

pub(super) fn open(settings: &GroundTruthSettings) -> Result<OpenedSource, GroundTruthError> {
    match settings.kind {
        GroundTruthKind::None => {
            info!("not using groundtruth");
            Ok(OpenedSource::direct(
                RecordSet::default(),
                PoseLayout::TIMESTAMP_XYZ,
            ))
        }
        GroundTruthKind::Simple => open_simple(settings),
        GroundTruthKind::Kitti => open_kitti(settings),
        GroundTruthKind::Tum => open_tum(settings),
        GroundTruthKind::Euroc => open_euroc(settings),
    }
}

fn open_simple(settings: &GroundTruthSettings) -> Result<OpenedSource, GroundTruthError> {
    let file = settings.groundtruth_file.as_deref().ok_or_else(|| {
        GroundTruthError::InvalidSetting("Simple ground truth requires a groundtruth_file".into())
    })?;
    let records = read_whitespace_records(&settings.base_path.join(file), 0)?;
    Ok(OpenedSource::direct(records, PoseLayout::TIMESTAMP_XYZ))
}

fn open_kitti(settings: &GroundTruthSettings) -> Result<OpenedSource, GroundTruthError> {
    let base = &settings.base_path;
    let poses = base.join("poses").join(format!("{}.txt", settings.name));
    let times = base.join("sequences").join(&settings.name).join("times.txt");

    let records = read_kitti_records(&poses, &times)?;
    Ok(OpenedSource::direct(records, PoseLayout::KITTI_MATRIX))
}

fn open_tum(settings: &GroundTruthSettings) -> Result<OpenedSource, GroundTruthError> {
    let sequence = settings.base_path.join(&settings.name);
    let associations_file = settings.associations.as_deref().ok_or_else(|| {
        GroundTruthError::InvalidSetting("TUM ground truth requires an associations file".into())
    })?;

    let gt_path = sequence.join("groundtruth.txt");
    let records = read_whitespace_records(&gt_path, TUM_COMMENT_LINES)?;
    let frames = read_whitespace_records(&sequence.join(associations_file), 0)?;

    open_associated(
        settings,
        records,
        frames,
        &sidecar_path(&gt_path, TUM_SIDECAR),
        EntryLayout::WithTimestamps,
    )
}

fn open_euroc(settings: &GroundTruthSettings) -> Result<OpenedSource, GroundTruthError> {
    let mav0 = settings.base_path.join(&settings.name).join("mav0");
    let gt_path = mav0.join("state_groundtruth_estimate0").join("data.tum");

    let records = read_whitespace_records(&gt_path, 0)?;
    if records.is_empty() {
        return Err(GroundTruthError::EmptySource(gt_path.to_string()));
    }
    info!(samples = records.len(), "processing EuRoC groundtruth");

    let frames = read_euroc_frames(&mav0.join("cam0").join("data.csv"))?;

    open_associated(
        settings,
        records,
        frames,
        &sidecar_path(&gt_path, EUROC_SIDECAR),
        EntryLayout::Compact,
    )
}

fn open_associated(
    settings: &GroundTruthSettings,
    records: RecordSet,
    frames: RecordSet,
    sidecar: &Utf8Path,
    layout: EntryLayout,
) -> Result<OpenedSource, GroundTruthError> {
    let map = cache::load_or_build(sidecar, || {
        let association = associate(
            frames.as_slice(),
            records.as_slice(),
            settings.time_offset,
            settings.max_time_difference,
            layout,
        );
        Ok(association.map)
    })?;

    Ok(OpenedSource {
        records,
        layout: PoseLayout::TIMESTAMP_XYZ,
        frames: Some(frames),
        associations: Some(map),
    })
}

fn sidecar_path(gt_path: &Utf8Path, file_name: &str) -> Utf8PathBuf {
    gt_path
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| Utf8PathBuf::from(file_name))
}
