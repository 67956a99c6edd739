use super::{load_artifact, save_artifact, Artifact, ArtifactLoadError, ArtifactSaveError};
use crate::features::FeatureSchema;
use crate::model::{build_model, Classifier, DecisionThreshold, FittedClassifier, FittedPipeline};
use ndarray::{array, Array2};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn fitted() -> (FittedPipeline, FeatureSchema) {
    let x = array![
        [7.4, 0.70, 9.4],
        [7.8, 0.88, 9.8],
        [11.2, 0.28, 9.8],
        [8.3, 0.30, 12.5],
        [7.3, 0.65, 10.0],
        [8.9, 0.22, 12.9],
        [6.7, 0.58, 9.5],
        [10.1, 0.31, 11.6],
    ];
    let y = [0, 0, 0, 1, 0, 1, 0, 1];
    let schema = FeatureSchema::new(["fixed acidity", "volatile acidity", "alcohol"]).unwrap();
    (build_model().fit(x.view(), &y).unwrap(), schema)
}

fn sample_rows() -> Array2<f64> {
    array![[7.0, 0.5, 10.0], [9.9, 0.123456789, 13.37], [0.0, 0.0, 0.0], [1e3, -4.2, 1e-9]]
}

fn write_json(dir: &std::path::Path, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("model.json");
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
    path
}

#[test]
fn test_save_load_cycle_is_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let (model, schema) = fitted();
    let threshold = DecisionThreshold::new(0.7).unwrap();

    let saved = save_artifact(&model, &schema, threshold, &path).unwrap();
    assert_eq!(saved, path);

    let loaded: Artifact = load_artifact(&path).unwrap();
    assert_eq!(loaded.features(), &schema);
    assert_eq!(loaded.threshold(), threshold);
    assert_eq!(loaded.model(), &model);

    // Bit-for-bit identical scores
    let before = model.predict_proba(sample_rows().view());
    let after = loaded.model().predict_proba(sample_rows().view());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_artifact_save_method_matches_free_function() {
    let dir = tempdir().unwrap();
    let (model, schema) = fitted();
    let artifact = Artifact::new(model, schema, DecisionThreshold::default());

    let path = artifact.save(&dir.path().join("nested").join("model.json")).unwrap();
    let loaded: Artifact = load_artifact(&path).unwrap();
    assert_eq!(loaded, artifact);
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    let (model, schema) = fitted();
    let path = dir.path().join("model.json");

    save_artifact(&model, &schema, DecisionThreshold::default(), &path).unwrap();
    save_artifact(&model, &schema, DecisionThreshold::new(0.4).unwrap(), &path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("model.json")]);

    // Replaced wholesale
    let loaded: Artifact = load_artifact(&path).unwrap();
    assert_eq!(loaded.threshold().value(), 0.4);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let result = load_artifact::<FittedPipeline>(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ArtifactLoadError::NotFound(_))));
}

#[test]
fn test_load_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, b"not json at all").unwrap();

    let result = load_artifact::<FittedPipeline>(&path);
    assert!(matches!(result, Err(ArtifactLoadError::Malformed { .. })));
}

#[test]
fn test_load_rejects_missing_field() {
    let dir = tempdir().unwrap();
    let (model, schema) = fitted();
    let path = write_json(
        dir.path(),
        json!({ "model": model, "features": schema, "layout_hash": schema.layout_hash() }),
    );

    match load_artifact::<FittedPipeline>(&path) {
        Err(ArtifactLoadError::Malformed { source, .. }) => {
            assert!(source.to_string().contains("threshold"));
        }
        other => panic!("Expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_out_of_range_threshold() {
    let dir = tempdir().unwrap();
    let (model, schema) = fitted();
    let path = write_json(
        dir.path(),
        json!({
            "model": model,
            "features": schema,
            "threshold": 1.5,
            "layout_hash": schema.layout_hash()
        }),
    );

    assert!(matches!(
        load_artifact::<FittedPipeline>(&path),
        Err(ArtifactLoadError::Malformed { .. })
    ));
}

#[test]
fn test_load_rejects_layout_hash_mismatch() {
    let dir = tempdir().unwrap();
    let (model, schema) = fitted();
    let path = write_json(
        dir.path(),
        json!({
            "model": model,
            "features": schema,
            "threshold": 0.7,
            "layout_hash": !schema.layout_hash()
        }),
    );

    match load_artifact::<FittedPipeline>(&path) {
        Err(ArtifactLoadError::Incompatible { reason, .. }) => assert!(reason.contains("hash")),
        other => panic!("Expected Incompatible, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_width_mismatch() {
    let dir = tempdir().unwrap();
    let (model, _) = fitted();
    let two = FeatureSchema::new(["a", "b"]).unwrap();
    let path = write_json(
        dir.path(),
        json!({
            "model": model,
            "features": two,
            "threshold": 0.7,
            "layout_hash": two.layout_hash()
        }),
    );

    match load_artifact::<FittedPipeline>(&path) {
        Err(ArtifactLoadError::Incompatible { reason, .. }) => {
            assert!(reason.contains("3 features"))
        }
        other => panic!("Expected Incompatible, got {:?}", other),
    }
}

#[test]
fn test_save_refuses_width_mismatch_and_keeps_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let (model, schema) = fitted();

    save_artifact(&model, &schema, DecisionThreshold::default(), &path).unwrap();
    let deployed = fs::read(&path).unwrap();

    let two = FeatureSchema::new(["a", "b"]).unwrap();
    match save_artifact(&model, &two, DecisionThreshold::default(), &path) {
        Err(ArtifactSaveError::Incompatible { reason, .. }) => {
            assert!(reason.contains("3 features"));
        }
        other => panic!("Expected Incompatible, got {:?}", other),
    }

    assert_eq!(fs::read(&path).unwrap(), deployed);
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let loaded: Artifact = load_artifact(&path).unwrap();
    assert_eq!(loaded.features(), &schema);
}
