// Inspect model artifacts
//
// Prints what was loaded from MODEL_DIR and runs the fixed Rice input through
// the pipeline. Exits non-zero if the artifacts fail to load.
// Usage: MODEL_DIR=./artifacts cargo run --bin inspect_artifacts

use anyhow::Context;
use crop_recommender::{
    rice_reference_fields, Classifier, ModelArtifacts, Recommender, Scaler, ServerConfig,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    let artifacts = ModelArtifacts::load(&config.model_path(), &config.scaler_path())
        .with_context(|| format!("Failed to load artifacts from {}", config.model_dir.display()))?;

    println!("\n=== SCALER ({}) ===", config.scaler_path().display());
    match artifacts.scaler() {
        Scaler::Standard(s) => {
            println!("  kind: standard");
            println!("  mean: {:?}", s.mean());
            println!("  std:  {:?}", s.std());
        }
        Scaler::MinMax(s) => {
            println!("  kind: min_max");
            println!("  data_min: {:?}", s.data_min());
            println!("  data_max: {:?}", s.data_max());
        }
    }

    println!("\n=== CLASSIFIER ({}) ===", config.model_path().display());
    let classifier = artifacts.classifier();
    println!("  kind: {}", classifier.kind());
    println!("  features: {}", classifier.n_features());
    println!("  classes: {:?}", classifier.classes());
    if let Classifier::RandomForest { trees, .. } = classifier {
        let nodes: usize = trees.iter().map(|t| t.children_left.len()).sum();
        println!("  trees: {} ({} nodes total)", trees.len(), nodes);
    }

    let unknown: Vec<i64> = classifier
        .classes()
        .iter()
        .copied()
        .filter(|id| crop_recommender::lookup_crop(*id).is_none())
        .collect();
    if !unknown.is_empty() {
        println!("  WARNING: classes not in crop table: {:?}", unknown);
    }

    println!("\n=== REFERENCE INPUT (expected: Rice) ===");
    let recommender = Recommender::new(Arc::new(artifacts));
    let result = recommender
        .predict(&rice_reference_fields())
        .map_err(|e| anyhow::anyhow!(e.message()))?;
    println!("  class id: {}", result.class_id);
    println!("  {}", result.message());

    Ok(())
}
