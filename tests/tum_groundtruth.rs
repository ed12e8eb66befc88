use approx::assert_relative_eq;
use groundtruth::{
    association::cache, AssociationMap, GroundTruth, GroundTruthError, GroundTruthKind,
    GroundTruthSettings,
};

mod common;
use common::{tum_dataset, tum_sidecar, Dataset, TUM_SEQUENCE, TUM_T0};

fn open(ds: &Dataset) -> Result<GroundTruth, GroundTruthError> {
    let settings = GroundTruthSettings::builder(GroundTruthKind::Tum, ds.root())
        .name(TUM_SEQUENCE)
        .associations("associations.txt")
        .build()?;
    GroundTruth::new(settings)
}

#[test]
fn test_reconstruct_from_fresh_dataset() {
    let ds = tum_dataset();
    let gt = open(&ds).unwrap();

    assert_eq!(gt.num_samples(), 10);
    assert_eq!(gt.associations().unwrap().len(), 10);
    assert_eq!(gt.reconstruct(0), Err(GroundTruthError::OutOfRange(0)));

    for k in 1..10 {
        let pose = gt.reconstruct(k).unwrap();
        assert_relative_eq!(pose.timestamp, TUM_T0 + 0.03 * k as f64, epsilon = 1e-6);
        assert_relative_eq!(pose.position.x, 0.3 * k as f64, epsilon = 1e-9);
        assert_relative_eq!(pose.abs_scale, 0.3, epsilon = 1e-9);
    }
}

#[test]
fn test_sidecar_written_with_timestamps() {
    let ds = tum_dataset();
    let sidecar = tum_sidecar(&ds);
    assert!(!sidecar.exists());

    open(&ds).unwrap();

    let json: serde_json::Value = serde_json::from_str(&common::read(&sidecar)).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 10);
    for (key, value) in object {
        let k: usize = key.parse().unwrap();
        let tuple = value.as_array().unwrap();
        assert_eq!(tuple.len(), 4);
        assert_eq!(tuple[0].as_u64(), Some(3 * k as u64));
        assert!(tuple[1].as_f64().unwrap() < 0.025);
    }
}

#[test]
fn test_existing_sidecar_is_used_verbatim() {
    let ds = tum_dataset();
    // hand-written, including the string timestamps older tools produce
    ds.write(
        &format!("{TUM_SEQUENCE}/gt_associations.json"),
        r#"{"0": [5, 0.0, "1305031102.05", "1305031102.05"], "1": [6, 0.0, 1305031102.06, 1305031102.06]}"#,
    );

    let gt = open(&ds).unwrap();

    assert_eq!(gt.associations().unwrap().len(), 2);
    assert_relative_eq!(gt.resolve(0).unwrap().timestamp, TUM_T0 + 0.05, epsilon = 1e-6);
    assert_eq!(gt.resolve(2), Err(GroundTruthError::AssociationGap(2)));
    assert_relative_eq!(gt.reconstruct(1).unwrap().abs_scale, 0.1, epsilon = 1e-9);
}

#[test]
fn test_removed_association_shortens_trajectory_by_one() {
    let ds = tum_dataset();
    let (full, report) = open(&ds).unwrap().full_trajectory();
    assert_eq!(full.len(), 8);
    assert!(report.skipped.is_empty());

    let sidecar = tum_sidecar(&ds);
    let edited: AssociationMap = cache::load(&sidecar)
        .unwrap()
        .into_iter()
        .filter(|(k, _)| *k != 4)
        .collect();
    cache::save(&sidecar, &edited).unwrap();

    let (trajectory, report) = open(&ds).unwrap().full_trajectory();
    assert_eq!(trajectory.len(), full.len() - 1);
    assert_eq!(report.skipped, vec![4]);
    assert_eq!(report.without_predecessor, vec![5]);
}

#[test]
fn test_start_frame_offset_from_json_settings() {
    let ds = tum_dataset();
    let path = ds.write(
        "settings.json",
        &serde_json::json!({
            "type": "tum",
            "base_path": ds.root(),
            "name": TUM_SEQUENCE,
            "associations": "associations.txt",
            "start_frame_id": 2
        })
        .to_string(),
    );

    let settings = GroundTruthSettings::from_json_file(&path).unwrap();
    assert_eq!(settings.kind, GroundTruthKind::Tum);
    assert_eq!(settings.start_frame_offset, 2);

    let gt = GroundTruth::new(settings).unwrap();
    assert_relative_eq!(gt.resolve(0).unwrap().timestamp, TUM_T0 + 0.06, epsilon = 1e-6);
    // frame 7 is absolute index 9, the last frame
    assert!(gt.reconstruct(7).is_ok());
    assert_eq!(gt.resolve(8), Err(GroundTruthError::AssociationGap(10)));
}

#[test]
fn test_closest_timestamp() {
    let ds = tum_dataset();
    let gt = open(&ds).unwrap();

    let nearest = gt.closest_timestamp(TUM_T0 + 0.091).unwrap();
    assert_relative_eq!(nearest, TUM_T0 + 0.09, epsilon = 1e-6);
    // before the first interior sample
    let first = gt.closest_timestamp(0.0).unwrap();
    assert_relative_eq!(first, TUM_T0 + 0.03, epsilon = 1e-6);
}

#[test]
fn test_corrupted_sidecar() {
    let ds = tum_dataset();
    let sidecar = ds.write(
        &format!("{TUM_SEQUENCE}/gt_associations.json"),
        r#"{"0": [1, "oops"]"#,
    );

    match open(&ds) {
        Err(GroundTruthError::CacheCorrupted { path, .. }) => assert_eq!(path, sidecar.as_str()),
        other => panic!("expected CacheCorrupted, got {other:?}"),
    }
}

#[test]
fn test_missing_groundtruth_file() {
    let ds = tum_dataset();
    std::fs::remove_file(ds.root().join(TUM_SEQUENCE).join("groundtruth.txt")).unwrap();

    assert!(matches!(open(&ds), Err(GroundTruthError::NotFound(_))));
    assert!(!tum_sidecar(&ds).exists());
}

#[test]
fn test_missing_associations_setting() {
    let ds = tum_dataset();
    let err = GroundTruthSettings::builder(GroundTruthKind::Tum, ds.root())
        .name(TUM_SEQUENCE)
        .build()
        .unwrap_err();
    assert!(matches!(err, GroundTruthError::InvalidSetting(_)));
}
