use super::*;
use serde_json::json;
use std::thread;
use tempfile::TempDir;

const FEATURES: &[&str] = &["sqft_living", "hous_val_amt"];

fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|s| s.to_string()).collect()
}

/// Linear artifact that always predicts `intercept`.
fn write_constant_model(dir: &Path, name: &str, intercept: f64, version: Option<&str>) {
    let mut artifact = json!({
        "features": FEATURES,
        "estimator": {"kind": "linear", "intercept": intercept, "coefficients": [0.0, 0.0]}
    });
    if let Some(v) = version {
        artifact["version"] = json!(v);
    }
    fs::write(dir.join(name), artifact.to_string()).unwrap();
}

fn vector(values: [f64; 2]) -> FeatureVector {
    FeatureVector::new(feature_names(), values.to_vec()).unwrap()
}

fn host_with_models() -> (TempDir, ModelHost) {
    let dir = TempDir::new().unwrap();
    write_constant_model(dir.path(), "model.json", 1.0, None);
    write_constant_model(dir.path(), "model_v2.json", 2.0, Some("0.2.0"));
    let host = ModelHost::load(dir.path(), "model.json", "0.1.0").unwrap();
    (dir, host)
}

#[test]
fn test_load_uses_default_version_when_artifact_has_none() {
    let (_dir, host) = host_with_models();
    let info = host.current_info();
    assert_eq!(info.name, "model.json");
    assert_eq!(info.version, "0.1.0");
    assert_eq!(info.checksum.len(), 64);
    assert!(host.is_loaded());
    assert_eq!(host.feature_names(), feature_names());
}

#[test]
fn test_load_missing_initial_model_fails() {
    let dir = TempDir::new().unwrap();
    let result = ModelHost::load(dir.path(), "model.json", "0.1.0");
    assert!(matches!(result, Err(ServiceError::ModelNotFound { .. })));
}

#[test]
fn test_predict_reports_active_model() {
    let (_dir, host) = host_with_models();
    let output = host.predict(&vector([1560.0, 275000.0])).unwrap();
    assert_eq!(output.value, 1.0);
    assert_eq!(output.model.name, "model.json");
}

#[test]
fn test_predict_rejects_mismatched_features() {
    let (_dir, host) = host_with_models();
    let reordered = FeatureVector::new(
        vec!["hous_val_amt".to_string(), "sqft_living".to_string()],
        vec![1.0, 2.0],
    )
    .unwrap();
    assert!(matches!(
        host.predict(&reordered),
        Err(ServiceError::Prediction { .. })
    ));
}

#[test]
fn test_reload_swaps_model() {
    let (_dir, host) = host_with_models();
    let info = host.reload("model_v2.json").unwrap();
    assert_eq!(info.name, "model_v2.json");
    assert_eq!(info.version, "0.2.0");
    assert_eq!(host.current_info(), info);
    assert_eq!(host.predict(&vector([0.0, 0.0])).unwrap().value, 2.0);
}

#[test]
fn test_reload_missing_file_keeps_previous_model() {
    let (_dir, host) = host_with_models();
    let before = host.current_info();

    let err = host.reload("does_not_exist.json").unwrap_err();
    assert!(matches!(err, ServiceError::ModelNotFound { ref model_name, .. } if model_name == "does_not_exist.json"));

    assert_eq!(host.current_info(), before);
    assert_eq!(host.predict(&vector([0.0, 0.0])).unwrap().value, 1.0);
}

#[test]
fn test_reload_invalid_artifact_keeps_previous_model() {
    let (dir, host) = host_with_models();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let err = host.reload("broken.json").unwrap_err();
    assert!(matches!(err, ServiceError::ModelLoad { .. }));
    assert_eq!(host.current_info().name, "model.json");
}

#[test]
fn test_reload_rejects_path_traversal() {
    let (_dir, host) = host_with_models();
    for name in ["../model.json", "sub/model.json", "..", "", "  "] {
        let err = host.reload(name).unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation { .. }),
            "{name:?} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn test_concurrent_predictions_see_consistent_model_during_reloads() {
    let (_dir, host) = host_with_models();
    let host = Arc::new(host);

    let reloader = {
        let host = Arc::clone(&host);
        thread::spawn(move || {
            for i in 0..50 {
                let name = if i % 2 == 0 { "model_v2.json" } else { "model.json" };
                host.reload(name).unwrap();
            }
        })
    };

    let predictors: Vec<_> = (0..4)
        .map(|_| {
            let host = Arc::clone(&host);
            thread::spawn(move || {
                for _ in 0..200 {
                    let output = host.predict(&vector([1.0, 1.0])).unwrap();
                    let expected = if output.model.name == "model.json" { 1.0 } else { 2.0 };
                    assert_eq!(output.value, expected, "value and model identity diverged");
                }
            })
        })
        .collect();

    reloader.join().unwrap();
    for p in predictors {
        p.join().unwrap();
    }
}

#[test]
fn test_require_features_checks_current_model() {
    let (_dir, host) = host_with_models();
    let err = host
        .require_features(vec!["sqft_living".to_string()])
        .err()
        .unwrap();
    assert!(matches!(err, ServiceError::Configuration { .. }));

    let (_dir, host) = host_with_models();
    assert!(host.require_features(feature_names()).is_ok());
}

#[test]
fn test_pinned_features_reject_reload_with_other_features() {
    let (dir, host) = host_with_models();
    let host = host.require_features(feature_names()).unwrap();
    let other = json!({
        "features": ["sqft_living"],
        "estimator": {"kind": "linear", "intercept": 3.0, "coefficients": [0.0]}
    });
    fs::write(dir.path().join("narrow.json"), other.to_string()).unwrap();

    let err = host.reload("narrow.json").unwrap_err();
    assert!(matches!(err, ServiceError::ModelLoad { ref model_name, .. } if model_name == "narrow.json"));
    assert_eq!(host.current_info().name, "model.json");
    assert_eq!(host.predict(&vector([0.0, 0.0])).unwrap().value, 1.0);

    // Same features still reload
    assert_eq!(host.reload("model_v2.json").unwrap().name, "model_v2.json");
}

#[test]
fn test_with_active_sees_one_model() {
    let (_dir, host) = host_with_models();
    let (names, output) = host.with_active(|handle| {
        (
            handle.artifact.features.clone(),
            handle.predict(&vector([0.0, 0.0])).unwrap(),
        )
    });
    assert_eq!(names, feature_names());
    assert_eq!(output.model.name, "model.json");
}
