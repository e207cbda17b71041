use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ModelRegistry, RiskModel};
use crate::config::ModelPaths;
use crate::model::artifact::ArtifactError;
use crate::model::risk::RiskLevel;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("screening_core_registry_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const TREE_MODEL: &str = r#"{
    "estimator": {
        "kind": "decision_tree",
        "classes": ["Low", "High"],
        "n_features": 9,
        "children_left": [-1],
        "children_right": [-1],
        "feature": [-2],
        "threshold": [-2.0],
        "value": [[1.0, 3.0]]
    }
}"#;

#[test]
fn test_missing_artifacts_reported_per_slot() {
    let registry = ModelRegistry::new(ModelPaths::under(&make_temp_dir()));
    assert!(registry.risk_model().unwrap_err().is_missing());
    assert!(registry.progress_model().unwrap_err().is_missing());
    assert!(registry.survey_model().unwrap_err().is_missing());
}

#[test]
fn test_risk_slot_loads_once() {
    let dir = make_temp_dir();
    let paths = ModelPaths::under(&dir);
    fs::write(&paths.risk_model, TREE_MODEL).unwrap();

    let registry = ModelRegistry::new(paths.clone());
    let first = registry.risk_model().unwrap() as *const RiskModel;

    // Later edits on disk do not reach an initialized slot.
    fs::remove_file(&paths.risk_model).unwrap();
    let second = registry.risk_model().unwrap() as *const RiskModel;
    assert_eq!(first, second);
}

#[test]
fn test_risk_model_without_scaler_and_inferred_labels() {
    let dir = make_temp_dir();
    let paths = ModelPaths::under(&dir);
    fs::write(&paths.risk_model, TREE_MODEL).unwrap();

    let model = RiskModel::load(&paths.risk_model, &paths.risk_scaler).unwrap();
    assert!(model.scaler.is_none());
    assert_eq!(model.labels.len(), 2);
    assert_eq!(model.labels.resolve(&serde_json::json!("High")), RiskLevel::High);
}

#[test]
fn test_corrupt_scaler_fails_the_slot() {
    let dir = make_temp_dir();
    let paths = ModelPaths::under(&dir);
    fs::write(&paths.risk_model, TREE_MODEL).unwrap();
    fs::write(&paths.risk_scaler, "{\"kind\": \"standard\"").unwrap();

    let registry = ModelRegistry::new(paths);
    assert!(matches!(
        registry.risk_model(),
        Err(ArtifactError::Decode { .. })
    ));
}

#[test]
fn test_registry_shared_across_threads() {
    let dir = make_temp_dir();
    let paths = ModelPaths::under(&dir);
    fs::write(&paths.risk_model, TREE_MODEL).unwrap();
    let registry = Arc::new(ModelRegistry::new(paths));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.risk_model().is_ok())
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
