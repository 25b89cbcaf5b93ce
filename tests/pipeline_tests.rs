// Pipeline Integration Tests
//
// Purpose: Run the full parse → scale → classify → label flow against the
// JSON artifacts in tests/fixtures/
// Run with: cargo test --test pipeline_tests

use crop_recommender::{
    rice_reference_fields, ArtifactError, ModelArtifacts, Recommender, ServerConfig,
};
use std::collections::HashMap;
use std::path::PathBuf;

fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load(name: &str) -> Result<ModelArtifacts, ArtifactError> {
    let config = ServerConfig::with_model_dir(fixture_dir(name));
    ModelArtifacts::load(&config.model_path(), &config.scaler_path())
}

fn recommender(name: &str) -> Recommender {
    Recommender::from_load(load(name))
}

fn maize_fields() -> HashMap<String, String> {
    [
        ("Nitrogen", "78"),
        ("Phosphorus", "48"),
        ("Potassium", "20"),
        ("Temperature", "22.39"),
        ("Humidity", "65.09"),
        ("Ph", "6.25"),
        ("Rainfall", "84.77"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// =========================================================================
// Reference scenario
// =========================================================================

#[test]
fn test_rice_reference_input_centroid_model() {
    let recommender = recommender("");
    assert!(recommender.is_ready());

    let result = recommender.predict(&rice_reference_fields()).unwrap();
    assert_eq!(result.class_id, 1);

    let msg = recommender.recommend(&rice_reference_fields());
    assert!(msg.contains("Rice"), "unexpected message: {}", msg);
}

#[test]
fn test_rice_reference_input_forest_model() {
    let recommender = recommender("forest");
    let msg = recommender.recommend(&rice_reference_fields());
    assert!(msg.contains("Rice"), "unexpected message: {}", msg);
}

#[test]
fn test_maize_input_both_models() {
    for name in ["", "forest"] {
        let result = recommender(name).predict(&maize_fields()).unwrap();
        assert_eq!(result.class_id, 2, "fixture '{}'", name);
        assert_eq!(result.crop.unwrap().name, "Maize");
    }
}

// =========================================================================
// Error contract
// =========================================================================

#[test]
fn test_missing_field_message() {
    let recommender = recommender("");
    let mut raw = rice_reference_fields();
    raw.remove("Potassium");
    assert_eq!(recommender.recommend(&raw), "❌ Missing field: Potassium");
}

#[test]
fn test_validation_message() {
    let recommender = recommender("");
    let mut raw = rice_reference_fields();
    raw.insert("Nitrogen".to_string(), "abc".to_string());
    assert_eq!(
        recommender.recommend(&raw),
        "❌ Invalid input: Nitrogen must be an integer (got 'abc')"
    );
}

#[test]
fn test_extreme_values_still_classify() {
    let recommender = recommender("");
    let mut raw = rice_reference_fields();
    raw.insert("Rainfall".to_string(), "-500".to_string());
    raw.insert("Ph".to_string(), "14.5".to_string());
    assert!(recommender.recommend(&raw).starts_with("🎯 Perfect!"));
}

#[test]
fn test_non_finite_values_rejected_for_both_models() {
    for dir in ["", "forest"] {
        let recommender = recommender(dir);
        for text in ["nan", "inf", "-inf", "1e400"] {
            let mut raw = rice_reference_fields();
            raw.insert("Rainfall".to_string(), text.to_string());
            let msg = recommender.recommend(&raw);
            assert!(msg.starts_with("❌ Invalid input: Rainfall"), "{} [{}]: {}", text, dir, msg);
            assert!(!msg.contains("Perfect"), "{}", msg);
        }
    }
}

// =========================================================================
// Artifact loading
// =========================================================================

#[test]
fn test_feature_count_mismatch_rejected_at_load() {
    let err = load("mismatched").unwrap_err();
    assert!(matches!(err, ArtifactError::Shape { .. }), "{:?}", err);
}

#[test]
fn test_missing_artifacts_leave_pipeline_unusable() {
    let recommender = recommender("no_such_dir");
    assert!(!recommender.is_ready());
    let msg = recommender.recommend(&rice_reference_fields());
    assert!(msg.starts_with("❌ Error: model not loaded"), "{}", msg);
}

// =========================================================================
// Determinism
// =========================================================================

#[test]
fn test_repeated_calls_return_identical_output() {
    let recommender = recommender("forest");
    let outputs: Vec<String> = (0..5)
        .map(|_| recommender.recommend(&rice_reference_fields()))
        .collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_concurrent_readers_share_artifacts() {
    let recommender = std::sync::Arc::new(recommender(""));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let recommender = recommender.clone();
            std::thread::spawn(move || recommender.recommend(&rice_reference_fields()))
        })
        .collect();
    let expected = recommender.recommend(&rice_reference_fields());
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
