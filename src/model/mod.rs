//! Model artifacts
//!
//! The scaler and classifier are fitted offline and loaded once at startup.
//! The pipeline only sees them through `CropModel`, so tests can swap in a
//! deterministic stub without touching files on disk.

pub mod classifier;
pub mod scaler;

pub use classifier::{Classifier, DecisionTree};
pub use scaler::Scaler;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{ArtifactError, InferenceError};
use crate::features::{FeatureVector, ScaledFeatureVector, FEATURE_COUNT};

/// Capability surface of the fitted artifacts.
///
/// Implementations are shared read-only across requests.
pub trait CropModel: Send + Sync {
    fn scale(&self, features: &FeatureVector) -> Result<ScaledFeatureVector, InferenceError>;

    fn classify(&self, scaled: &ScaledFeatureVector) -> Result<i64, InferenceError>;
}

/// A validated scaler/classifier pair.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    scaler: Scaler,
    classifier: Classifier,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ModelArtifacts {
    /// Pair a scaler with a classifier, checking both are fitted on the
    /// seven canonical features.
    pub fn new(scaler: Scaler, classifier: Classifier) -> Result<Self, ArtifactError> {
        classifier.validate()?;

        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::shape(
                "scaler",
                format!("fitted on {} features, expected {}", scaler.n_features(), FEATURE_COUNT),
            ));
        }
        if classifier.n_features() != scaler.n_features() {
            return Err(ArtifactError::shape(
                "classifier",
                format!(
                    "fitted on {} features but scaler produces {}",
                    classifier.n_features(),
                    scaler.n_features()
                ),
            ));
        }

        Ok(Self { scaler, classifier })
    }

    /// Load both artifacts from JSON files.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let classifier: Classifier = read_json(model_path)?;
        let scaler = Scaler::from_value(read_json(scaler_path)?)?;
        let artifacts = Self::new(scaler, classifier)?;

        tracing::info!(
            "Loaded {} classifier ({} classes) and {} scaler",
            artifacts.classifier.kind(),
            artifacts.classifier.classes().len(),
            artifacts.scaler.kind()
        );
        Ok(artifacts)
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

impl CropModel for ModelArtifacts {
    fn scale(&self, features: &FeatureVector) -> Result<ScaledFeatureVector, InferenceError> {
        self.scaler
            .transform(&features.to_array())
            .map(ScaledFeatureVector::new)
    }

    fn classify(&self, scaled: &ScaledFeatureVector) -> Result<i64, InferenceError> {
        self.classifier.predict(scaled.as_slice())
    }
}
