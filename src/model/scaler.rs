//! Fitted feature scalers
//!
//! Wraps aprender's `StandardScaler` and `MinMaxScaler`. The artifact is the
//! aprender scaler's own JSON plus a `kind` tag, e.g.
//!
//! ```json
//! { "kind": "standard", "mean": [...7 values], "std": [...7 values] }
//! { "kind": "min_max", "data_min": [...], "data_max": [...], "feature_min": 0.0, "feature_max": 1.0 }
//! ```
//!
//! `with_mean`/`with_std` default to true and the min-max target range
//! defaults to `[0, 1]` when omitted.

use aprender::preprocessing::{MinMaxScaler, StandardScaler};
use aprender::primitives::Matrix;
use aprender::traits::Transformer;
use serde_json::{Map, Value};

use crate::error::{ArtifactError, InferenceError};

#[derive(Debug, Clone)]
pub enum Scaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

/// Fitted parameter arrays must be present, non-empty, equally long and
/// finite. aprender's accessors panic on missing parameters, so this runs
/// before the scaler is deserialized.
fn check_params(obj: &Map<String, Value>, names: [&str; 2]) -> Result<(), ArtifactError> {
    let mut lengths = Vec::with_capacity(names.len());
    for name in names {
        let values = obj
            .get(name)
            .and_then(Value::as_array)
            .ok_or_else(|| ArtifactError::shape("scaler", format!("{} is missing", name)))?;
        if values.is_empty() {
            return Err(ArtifactError::shape("scaler", format!("{} is empty", name)));
        }
        let finite = values
            .iter()
            .all(|v| v.as_f64().map_or(false, |f| f.is_finite() && (f as f32).is_finite()));
        if !finite {
            return Err(ArtifactError::shape(
                "scaler",
                format!("{} must contain finite numbers", name),
            ));
        }
        lengths.push(values.len());
    }

    if lengths[0] != lengths[1] {
        return Err(ArtifactError::shape(
            "scaler",
            format!(
                "{} has {} values but {} has {}",
                names[0], lengths[0], names[1], lengths[1]
            ),
        ));
    }
    Ok(())
}

fn default_field(obj: &mut Map<String, Value>, name: &str, value: Value) {
    obj.entry(name.to_string()).or_insert(value);
}

impl Scaler {
    /// Build a scaler from its JSON artifact.
    pub fn from_value(value: Value) -> Result<Self, ArtifactError> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            _ => return Err(ArtifactError::shape("scaler", "expected a JSON object")),
        };
        let kind = obj
            .remove("kind")
            .and_then(|k| k.as_str().map(str::to_string))
            .ok_or_else(|| ArtifactError::shape("scaler", "kind is missing"))?;

        let invalid = |e: serde_json::Error| ArtifactError::shape("scaler", e.to_string());
        match kind.as_str() {
            "standard" => {
                check_params(&obj, ["mean", "std"])?;
                default_field(&mut obj, "with_mean", Value::Bool(true));
                default_field(&mut obj, "with_std", Value::Bool(true));
                let scaler: StandardScaler =
                    serde_json::from_value(Value::Object(obj)).map_err(invalid)?;
                Ok(Scaler::Standard(scaler))
            }
            "min_max" => {
                check_params(&obj, ["data_min", "data_max"])?;
                default_field(&mut obj, "feature_min", Value::from(0.0));
                default_field(&mut obj, "feature_max", Value::from(1.0));
                let scaler: MinMaxScaler =
                    serde_json::from_value(Value::Object(obj)).map_err(invalid)?;
                Ok(Scaler::MinMax(scaler))
            }
            other => Err(ArtifactError::shape(
                "scaler",
                format!("unknown kind '{}'", other),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard(_) => "standard",
            Scaler::MinMax(_) => "min_max",
        }
    }

    /// Number of features the scaler was fitted on (0 if unfitted).
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard(s) if s.is_fitted() => s.mean().len(),
            Scaler::MinMax(s) if s.is_fitted() => s.data_min().len(),
            _ => 0,
        }
    }

    /// Apply the fitted transform to one sample.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let expected = self.n_features();
        if values.len() != expected {
            return Err(InferenceError::ScalerShape {
                expected,
                actual: values.len(),
            });
        }

        let row: Vec<f32> = values.iter().map(|&v| v as f32).collect();
        let sample = Matrix::from_vec(1, expected, row)
            .map_err(|e| InferenceError::Scaler(e.to_string()))?;
        let scaled = match self {
            Scaler::Standard(s) => s.transform(&sample),
            Scaler::MinMax(s) => s.transform(&sample),
        }
        .map_err(|e| InferenceError::Scaler(e.to_string()))?;

        Ok(scaled.as_slice().iter().map(|&v| f64::from(v)).collect())
    }
}
