//! Error types for the recommendation pipeline.
//!
//! Three failure categories reach the caller (missing field, invalid field,
//! generic inference/load failure). Artifact errors only occur at startup and
//! are folded into the generic category once the recommender is built.

use std::path::PathBuf;
use thiserror::Error;

use crate::features::{FeatureField, FieldKind};

/// A single form field could not be turned into its numeric value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The field key was absent from the submitted fields.
    #[error("missing field: {}", .0.key())]
    Missing(FeatureField),

    /// The value was present but not convertible to the field's type.
    #[error("{} must be {} (got '{value}')", .field.key(), .expected.describe())]
    Invalid {
        field: FeatureField,
        value: String,
        expected: FieldKind,
    },
}

/// Scaling or classification failed for an otherwise valid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("scaler was fitted on {expected} features, got {actual}")]
    ScalerShape { expected: usize, actual: usize },

    #[error("scaler failed: {0}")]
    Scaler(String),

    #[error("classifier was fitted on {expected} features, got {actual}")]
    ClassifierShape { expected: usize, actual: usize },

    #[error("decision tree {tree} has no valid path at node {node}")]
    MalformedTree { tree: usize, node: usize },

    #[error("classifier produced no decision")]
    NoDecision,
}

/// Loading or validating a serialized artifact failed.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact}: {message}")]
    Shape {
        artifact: &'static str,
        message: String,
    },
}

impl ArtifactError {
    pub(crate) fn shape(artifact: &'static str, message: impl Into<String>) -> Self {
        ArtifactError::Shape {
            artifact,
            message: message.into(),
        }
    }
}

/// Everything that can stop a recommendation from being produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// Artifacts failed to load at startup; the pipeline stays unusable.
    #[error("model not loaded: {0}")]
    ModelUnavailable(String),
}

impl RecommendError {
    /// User-facing message, one distinct prefix per failure category.
    pub fn message(&self) -> String {
        match self {
            RecommendError::Field(FieldError::Missing(field)) => {
                format!("❌ Missing field: {}", field.key())
            }
            RecommendError::Field(err @ FieldError::Invalid { .. }) => {
                format!("❌ Invalid input: {}", err)
            }
            RecommendError::Inference(_) | RecommendError::ModelUnavailable(_) => {
                format!("❌ Error: {}", self)
            }
        }
    }

    /// True when the caller supplied bad input (as opposed to a server fault).
    pub fn is_input_error(&self) -> bool {
        matches!(self, RecommendError::Field(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_have_distinct_prefixes() {
        let missing = RecommendError::from(FieldError::Missing(FeatureField::Humidity));
        let invalid = RecommendError::from(FieldError::Invalid {
            field: FeatureField::Nitrogen,
            value: "abc".to_string(),
            expected: FieldKind::Integer,
        });
        let generic = RecommendError::from(InferenceError::NoDecision);

        assert_eq!(missing.message(), "❌ Missing field: Humidity");
        assert_eq!(
            invalid.message(),
            "❌ Invalid input: Nitrogen must be an integer (got 'abc')"
        );
        assert_eq!(
            generic.message(),
            "❌ Error: inference failed: classifier produced no decision"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(RecommendError::from(FieldError::Missing(FeatureField::Ph)).is_input_error());
        assert!(!RecommendError::ModelUnavailable("gone".into()).is_input_error());
    }
}
