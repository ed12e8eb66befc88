#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Ground truth positions move along x by this step per sample.
pub const GT_STEP: f64 = 0.1;

/// A dataset laid out in a temporary directory, removed on drop.
pub struct Dataset {
    dir: TempDir,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("non UTF-8 temp dir")
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// `timestamp x y z qx qy qz qw` lines at 100 Hz starting at `t0`, moving along x.
pub fn pose_lines(t0: f64, n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "{:.6} {:.6} 0.000000 0.000000 0.0 0.0 0.0 1.0\n",
                t0 + i as f64 * 0.01,
                i as f64 * GT_STEP
            )
        })
        .collect()
}

pub const TUM_T0: f64 = 1305031102.0;
pub const TUM_SEQUENCE: &str = "rgbd_dataset_freiburg1_xyz";

/// TUM sequence: 40 ground truth poses, 10 frames matching every third pose with 2 ms delay.
pub fn tum_dataset() -> Dataset {
    let ds = Dataset::new();
    let header = "# ground truth trajectory\n# file: 'rgbd_dataset_freiburg1_xyz.bag'\n\
                  # timestamp tx ty tz qx qy qz qw\n";
    ds.write(
        &format!("{TUM_SEQUENCE}/groundtruth.txt"),
        &format!("{header}{}", pose_lines(TUM_T0, 40)),
    );

    let associations: String = (0..10)
        .map(|k| {
            let t = TUM_T0 + (3 * k) as f64 * 0.01 + 0.002;
            format!("{t:.6} rgb/{t:.6}.png {t:.6} depth/{t:.6}.png\n")
        })
        .collect();
    ds.write(&format!("{TUM_SEQUENCE}/associations.txt"), &associations);
    ds
}

pub fn tum_sidecar(ds: &Dataset) -> Utf8PathBuf {
    ds.root()
        .join(TUM_SEQUENCE)
        .join("gt_associations.json")
}

pub const EUROC_NS0: u64 = 1_403_636_579_000_000_000;
pub const EUROC_SEQUENCE: &str = "MH_01_easy";

/// EuRoC sequence: 60 ground truth poses, 12 frames matching every fifth pose with 1 ms delay.
pub fn euroc_dataset() -> Dataset {
    let ds = Dataset::new();
    ds.write(
        &format!("{EUROC_SEQUENCE}/mav0/state_groundtruth_estimate0/data.tum"),
        &pose_lines(EUROC_NS0 as f64 / 1e9, 60),
    );

    let mut csv = String::from("#timestamp [ns],filename\n");
    for k in 0..12u64 {
        let ns = EUROC_NS0 + k * 50_000_000 + 1_000_000;
        csv.push_str(&format!("{ns},{ns}.png\n"));
    }
    ds.write(&format!("{EUROC_SEQUENCE}/mav0/cam0/data.csv"), &csv);
    ds
}

pub fn euroc_sidecar(ds: &Dataset) -> Utf8PathBuf {
    ds.root()
        .join(EUROC_SEQUENCE)
        .join("mav0/state_groundtruth_estimate0/associations.json")
}

/// KITTI sequence `00`: `n` poses moving along z, times every 0.1 s.
pub fn kitti_dataset(n: usize) -> Dataset {
    let ds = Dataset::new();
    let poses: String = (0..n)
        .map(|i| {
            format!(
                "1.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 0.0 1.0 {:.6}\n",
                i as f64 * GT_STEP
            )
        })
        .collect();
    let times: String = (0..n)
        .map(|i| format!("{:.6e}\n", i as f64 * 0.1))
        .collect();
    ds.write("poses/00.txt", &poses);
    ds.write("sequences/00/times.txt", &times);
    ds
}

pub fn read(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
