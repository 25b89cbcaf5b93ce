// Axum server: HTML form pages plus a small JSON API
//
// Artifacts are loaded once in AppState::new. A failed load does not stop the
// server; the recommender then answers every request with the load error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::crops::CROP_TABLE;
use crate::error::RecommendError;
use crate::model::ModelArtifacts;
use crate::pipeline::{Recommendation, Recommender};
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        tracing::info!(
            "Loading model from {} and scaler from {}",
            config.model_path().display(),
            config.scaler_path().display()
        );
        let loaded = ModelArtifacts::load(&config.model_path(), &config.scaler_path());
        Self::with_recommender(Recommender::from_load(loaded))
    }

    pub fn with_recommender(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // HTML form
        .route("/", get(pages::home_page))
        .route("/predict", post(pages::predict_page))
        .route("/test", get(pages::test_page))

        // JSON API
        .route("/api/recommend", post(recommend_json))
        .route("/api/crops", get(list_crops))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.recommender.is_ready();
    let status = if ready { "healthy" } else { "degraded" };
    Json(serde_json::json!({
        "status": status,
        "model_loaded": ready,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_crops() -> impl IntoResponse {
    Json(serde_json::json!({
        "rows": CROP_TABLE.len(),
        "data": CROP_TABLE,
    }))
}

/// JSON values are passed to the pipeline as their text form, so `90` and
/// `"90"` behave the same while `90.5` for an integer field is rejected.
/// A `null` counts as an absent field.
fn json_to_raw_fields(body: HashMap<String, Value>) -> HashMap<String, String> {
    body.into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

async fn recommend_json(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let raw = json_to_raw_fields(body);
    let recommendation: Recommendation = state.recommender.predict(&raw)?;

    Ok(Json(serde_json::json!({
        "message": recommendation.message(),
        "class_id": recommendation.class_id,
        "crop": recommendation.crop,
        "tip": recommendation.tip,
        "features": recommendation.features,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    Internal(String),
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        if err.is_input_error() {
            AppError::InvalidInput(err.message())
        } else {
            AppError::Internal(err.message())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_values_become_text() {
        let body: HashMap<String, Value> = serde_json::from_str(
            r#"{"Nitrogen": 90, "Ph": "6.5", "Rainfall": 202.93, "Humidity": null}"#,
        )
        .unwrap();
        let raw = json_to_raw_fields(body);
        assert_eq!(raw["Nitrogen"], "90");
        assert_eq!(raw["Ph"], "6.5");
        assert_eq!(raw["Rainfall"], "202.93");
        assert!(!raw.contains_key("Humidity"));
    }

    #[test]
    fn test_error_status_mapping() {
        use crate::error::{FieldError, InferenceError};
        use crate::features::FeatureField;

        let input = AppError::from(RecommendError::from(FieldError::Missing(FeatureField::Ph)));
        assert_eq!(input.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let internal = AppError::from(RecommendError::from(InferenceError::NoDecision));
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
