//! Crop Recommender
//!
//! Recommends a crop from seven soil and climate measurements using a
//! scaler and classifier fitted offline and loaded once at startup.
//!
//! - `features`: typed parsing of the seven form fields
//! - `model`: scaler/classifier artifacts behind the `CropModel` trait
//! - `crops`: crop label and cultivation tip tables
//! - `pipeline`: `Recommender`, the parse → scale → classify → label flow
//! - `api_server` / `web`: Axum routes and Askama pages (feature `api`)

pub mod config;
pub mod crops;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use config::ServerConfig;
pub use crops::{lookup_crop, CropLabel, CROP_TABLE};
pub use error::{ArtifactError, FieldError, InferenceError, RecommendError};
pub use features::{FeatureField, FeatureVector, ScaledFeatureVector};
pub use model::{Classifier, CropModel, ModelArtifacts, Scaler};
pub use pipeline::{rice_reference_fields, Recommendation, Recommender};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
