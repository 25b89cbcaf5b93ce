//! Feature parsing
//!
//! Turns the seven raw form strings into a typed `FeatureVector` in the fixed
//! order the scaler and classifier were fitted on:
//! `[N, P, K, temperature, humidity, pH, rainfall]`.
//!
//! No range checks are applied. Negative rainfall or a pH of 20 is passed to
//! the model as-is.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::FieldError;

/// Number of features the artifacts must be fitted on.
pub const FEATURE_COUNT: usize = 7;

/// One of the seven canonical input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

/// Numeric type a field must convert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Integer => "an integer",
            FieldKind::Float => "a number",
        }
    }
}

impl FeatureField {
    /// Canonical order, matching the column order used at fit time.
    pub const ALL: [FeatureField; FEATURE_COUNT] = [
        FeatureField::Nitrogen,
        FeatureField::Phosphorus,
        FeatureField::Potassium,
        FeatureField::Temperature,
        FeatureField::Humidity,
        FeatureField::Ph,
        FeatureField::Rainfall,
    ];

    /// Form key expected from the calling layer.
    pub fn key(&self) -> &'static str {
        match self {
            FeatureField::Nitrogen => "Nitrogen",
            FeatureField::Phosphorus => "Phosphorus",
            FeatureField::Potassium => "Potassium",
            FeatureField::Temperature => "Temperature",
            FeatureField::Humidity => "Humidity",
            FeatureField::Ph => "Ph",
            FeatureField::Rainfall => "Rainfall",
        }
    }

    /// Older form pages posted phosphorus under a misspelled key.
    fn legacy_key(&self) -> Option<&'static str> {
        match self {
            FeatureField::Phosphorus => Some("Phosporus"),
            _ => None,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FeatureField::Nitrogen | FeatureField::Phosphorus | FeatureField::Potassium => {
                FieldKind::Integer
            }
            _ => FieldKind::Float,
        }
    }

    /// Find this field's raw value, falling back to the legacy key.
    pub fn lookup<'a>(&self, raw: &'a HashMap<String, String>) -> Result<&'a str, FieldError> {
        raw.get(self.key())
            .or_else(|| self.legacy_key().and_then(|k| raw.get(k)))
            .map(|s| s.as_str())
            .ok_or(FieldError::Missing(*self))
    }
}

/// Parse an integer-valued field. Surrounding whitespace is ignored.
pub fn parse_integer(field: FeatureField, raw: &str) -> Result<i64, FieldError> {
    raw.trim().parse::<i64>().map_err(|_| FieldError::Invalid {
        field,
        value: raw.to_string(),
        expected: FieldKind::Integer,
    })
}

/// Parse a float-valued field. Surrounding whitespace is ignored.
pub fn parse_float(field: FeatureField, raw: &str) -> Result<f64, FieldError> {
    // NaN, infinities and overflowing literals parse but are not measurements.
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::Invalid {
            field,
            value: raw.to_string(),
            expected: FieldKind::Float,
        })
}

/// The seven agronomic measurements of one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Nitrogen content ratio in soil
    pub nitrogen: i64,
    /// Phosphorus content ratio in soil
    pub phosphorus: i64,
    /// Potassium content ratio in soil
    pub potassium: i64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Soil pH
    pub ph: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
}

impl FeatureVector {
    /// Parse all seven fields. Fields are checked in canonical order, so the
    /// first failing field determines the reported error.
    pub fn from_fields(raw: &HashMap<String, String>) -> Result<Self, FieldError> {
        let int = |field: FeatureField| parse_integer(field, field.lookup(raw)?);
        let float = |field: FeatureField| parse_float(field, field.lookup(raw)?);

        Ok(Self {
            nitrogen: int(FeatureField::Nitrogen)?,
            phosphorus: int(FeatureField::Phosphorus)?,
            potassium: int(FeatureField::Potassium)?,
            temperature: float(FeatureField::Temperature)?,
            humidity: float(FeatureField::Humidity)?,
            ph: float(FeatureField::Ph)?,
            rainfall: float(FeatureField::Rainfall)?,
        })
    }

    /// Values in canonical order, widened to `f64` for the model.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen as f64,
            self.phosphorus as f64,
            self.potassium as f64,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// A feature vector after the scaler's transform. Same order as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFeatureVector(Vec<f64>);

impl ScaledFeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rice_fields() -> HashMap<String, String> {
        fields(&[
            ("Nitrogen", "90"),
            ("Phosphorus", "42"),
            ("Potassium", "43"),
            ("Temperature", "20.87"),
            ("Humidity", "82.00"),
            ("Ph", "6.50"),
            ("Rainfall", "202.93"),
        ])
    }

    #[test]
    fn test_parse_full_vector() {
        let v = FeatureVector::from_fields(&rice_fields()).unwrap();
        assert_eq!(v.nitrogen, 90);
        assert_eq!(v.phosphorus, 42);
        assert_eq!(v.potassium, 43);
        assert_eq!(v.to_array(), [90.0, 42.0, 43.0, 20.87, 82.0, 6.5, 202.93]);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut raw = rice_fields();
        raw.remove("Humidity");
        assert_eq!(
            FeatureVector::from_fields(&raw),
            Err(FieldError::Missing(FeatureField::Humidity))
        );
    }

    #[test]
    fn test_non_numeric_text() {
        let mut raw = rice_fields();
        raw.insert("Nitrogen".into(), "abc".into());
        match FeatureVector::from_fields(&raw) {
            Err(FieldError::Invalid { field, value, expected }) => {
                assert_eq!(field, FeatureField::Nitrogen);
                assert_eq!(value, "abc");
                assert_eq!(expected, FieldKind::Integer);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_fields_reject_decimals() {
        assert!(parse_integer(FeatureField::Potassium, "43.5").is_err());
        assert_eq!(parse_integer(FeatureField::Potassium, " 43 "), Ok(43));
        assert_eq!(parse_integer(FeatureField::Potassium, "-7"), Ok(-7));
    }

    #[test]
    fn test_float_fields_accept_integers_and_exponents() {
        assert_eq!(parse_float(FeatureField::Rainfall, "200"), Ok(200.0));
        assert_eq!(parse_float(FeatureField::Rainfall, "2.5e2"), Ok(250.0));
        assert!(parse_float(FeatureField::Rainfall, "").is_err());
    }

    #[test]
    fn test_float_fields_reject_non_finite() {
        for text in ["nan", "NaN", "inf", "-inf", "infinity", "1e400"] {
            assert_eq!(
                parse_float(FeatureField::Temperature, text),
                Err(FieldError::Invalid {
                    field: FeatureField::Temperature,
                    value: text.to_string(),
                    expected: FieldKind::Float,
                }),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let mut raw = rice_fields();
        raw.insert("Rainfall".into(), "-10".into());
        raw.insert("Ph".into(), "20".into());
        let v = FeatureVector::from_fields(&raw).unwrap();
        assert_eq!(v.rainfall, -10.0);
        assert_eq!(v.ph, 20.0);
    }

    #[test]
    fn test_legacy_phosphorus_key() {
        let mut raw = rice_fields();
        let p = raw.remove("Phosphorus").unwrap();
        raw.insert("Phosporus".into(), p);
        assert_eq!(FeatureVector::from_fields(&raw).unwrap().phosphorus, 42);
    }

    #[test]
    fn test_first_failing_field_wins() {
        let raw = fields(&[("Nitrogen", "x")]);
        assert!(matches!(
            FeatureVector::from_fields(&raw),
            Err(FieldError::Invalid { field: FeatureField::Nitrogen, .. })
        ));
    }
}
