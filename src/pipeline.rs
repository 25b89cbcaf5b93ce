//! Inference pipeline
//!
//! `Received → Parsed → Scaled → Classified → Labeled → Formatted`
//!
//! Parsing, scaling and classification can fail; each failure maps to one of
//! three message categories. `recommend` never returns an error: every path
//! produces a displayable string.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::crops::{lookup_crop, tip_or_default, CropLabel};
use crate::error::{ArtifactError, RecommendError};
use crate::features::{FeatureField, FeatureVector};
use crate::model::{CropModel, ModelArtifacts};

/// Fixed input used by the `/test` endpoint and `inspect_artifacts`.
/// Reference artifacts are expected to classify it as Rice (id 1).
pub const RICE_REFERENCE_INPUT: [(FeatureField, &str); 7] = [
    (FeatureField::Nitrogen, "90"),
    (FeatureField::Phosphorus, "42"),
    (FeatureField::Potassium, "43"),
    (FeatureField::Temperature, "20.87"),
    (FeatureField::Humidity, "82.00"),
    (FeatureField::Ph, "6.50"),
    (FeatureField::Rainfall, "202.93"),
];

pub fn rice_reference_fields() -> HashMap<String, String> {
    RICE_REFERENCE_INPUT
        .iter()
        .map(|(field, value)| (field.key().to_string(), value.to_string()))
        .collect()
}

/// Successful outcome of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub features: FeatureVector,
    pub class_id: i64,
    /// `None` when the classifier emitted an id outside the crop table.
    pub crop: Option<CropLabel>,
    pub tip: Option<&'static str>,
}

impl Recommendation {
    fn new(features: FeatureVector, class_id: i64) -> Self {
        let crop = lookup_crop(class_id).copied();
        let tip = crop.map(|c| tip_or_default(c.name));
        Self {
            features,
            class_id,
            crop,
            tip,
        }
    }

    pub fn message(&self) -> String {
        match (&self.crop, self.tip) {
            (Some(crop), Some(tip)) => format!(
                "🎯 Perfect! You should grow: {} 💡 Tip: {}",
                crop.display(),
                tip
            ),
            (Some(crop), None) => format!("🎯 Perfect! You should grow: {}", crop.display()),
            (None, _) => format!(
                "🤔 No suitable crop found for these conditions (class {}).",
                self.class_id
            ),
        }
    }
}

/// Holds the loaded artifacts, or the reason they could not be loaded.
pub struct Recommender {
    model: Result<Arc<dyn CropModel>, String>,
}

impl Recommender {
    pub fn new(model: Arc<dyn CropModel>) -> Self {
        Self { model: Ok(model) }
    }

    /// A recommender whose every call fails with the given load error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: Err(reason.into()),
        }
    }

    /// Build from the result of the one-shot artifact load.
    pub fn from_load(result: Result<ModelArtifacts, ArtifactError>) -> Self {
        match result {
            Ok(artifacts) => Self::new(Arc::new(artifacts)),
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_ok()
    }

    /// Load failure reason, if any.
    pub fn load_error(&self) -> Option<&str> {
        self.model.as_ref().err().map(|s| s.as_str())
    }

    /// Typed pipeline: parse, scale, classify, look up label and tip.
    pub fn predict(&self, raw: &HashMap<String, String>) -> Result<Recommendation, RecommendError> {
        let model = self
            .model
            .as_ref()
            .map_err(|reason| RecommendError::ModelUnavailable(reason.clone()))?;

        let features = FeatureVector::from_fields(raw)?;
        let scaled = model.scale(&features)?;
        let class_id = model.classify(&scaled)?;
        tracing::debug!("Classified {:?} as class {}", features, class_id);

        Ok(Recommendation::new(features, class_id))
    }

    /// Display string for a request: the recommendation or a failure message.
    pub fn recommend(&self, raw: &HashMap<String, String>) -> String {
        match self.predict(raw) {
            Ok(recommendation) => recommendation.message(),
            Err(e) => {
                tracing::warn!("Recommendation failed: {}", e);
                e.message()
            }
        }
    }
}
