// Page handlers for HTML rendering with Askama

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Form,
};
use askama::Template;
use std::collections::HashMap;

use crate::api_server::AppState;
use crate::features::{FeatureField, FieldKind};
use crate::pipeline::rice_reference_fields;

// ============================================================================
// Home Page
// ============================================================================

/// One input of the measurement form.
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub step: &'static str,
    /// Previously submitted value, echoed back after a prediction.
    pub value: String,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub fields: Vec<FormField>,
    pub result: Option<String>,
}

fn label_for(field: FeatureField) -> (&'static str, &'static str) {
    match field {
        FeatureField::Nitrogen => ("Nitrogen (N)", "e.g. 90"),
        FeatureField::Phosphorus => ("Phosphorus (P)", "e.g. 42"),
        FeatureField::Potassium => ("Potassium (K)", "e.g. 43"),
        FeatureField::Temperature => ("Temperature (°C)", "e.g. 20.87"),
        FeatureField::Humidity => ("Humidity (%)", "e.g. 82.00"),
        FeatureField::Ph => ("Soil pH", "e.g. 6.50"),
        FeatureField::Rainfall => ("Rainfall (mm)", "e.g. 202.93"),
    }
}

fn form_fields(submitted: &HashMap<String, String>) -> Vec<FormField> {
    FeatureField::ALL
        .iter()
        .map(|field| {
            let (label, placeholder) = label_for(*field);
            FormField {
                key: field.key(),
                label,
                placeholder,
                step: match field.kind() {
                    FieldKind::Integer => "1",
                    FieldKind::Float => "any",
                },
                value: field.lookup(submitted).unwrap_or_default().to_string(),
            }
        })
        .collect()
}

fn render_home(submitted: &HashMap<String, String>, result: Option<String>) -> Html<String> {
    let template = HomeTemplate {
        title: "Crop Recommendation".to_string(),
        fields: form_fields(submitted),
        result,
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}

pub async fn home_page() -> impl IntoResponse {
    render_home(&HashMap::new(), None)
}

// ============================================================================
// Prediction
// ============================================================================

pub async fn predict_page(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let result = state.recommender.recommend(&fields);
    render_home(&fields, Some(result))
}

/// Fixed Rice input, for checking a deployment end to end.
pub async fn test_page(State(state): State<AppState>) -> impl IntoResponse {
    let fields = rice_reference_fields();
    let result = state.recommender.recommend(&fields);
    render_home(&fields, Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_echo_submitted_values() {
        let mut submitted = HashMap::new();
        submitted.insert("Nitrogen".to_string(), "77".to_string());
        let fields = form_fields(&submitted);
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0].key, "Nitrogen");
        assert_eq!(fields[0].value, "77");
        assert_eq!(fields[0].step, "1");
        assert_eq!(fields[6].step, "any");
        assert!(fields[1].value.is_empty());
    }

    #[test]
    fn test_render_includes_result() {
        let Html(body) = render_home(&HashMap::new(), Some("🎯 Perfect! You should grow: Rice 🌾".into()));
        assert!(body.contains("You should grow: Rice"));
        assert!(body.contains("name=\"Rainfall\""));
    }
}
