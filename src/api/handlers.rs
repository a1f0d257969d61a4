//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifacts::ArtifactStore;
use crate::encoding;
use crate::error::ApiError;
use crate::metrics::{
    inc_artifact_unavailable, inc_encoding_failures, inc_prediction_failures,
    inc_predictions_served, record_predict_latency,
};
use crate::model::Predictor;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared artifact store.
    pub store: Arc<ArtifactStore>,
    /// Prometheus render handle, when the recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state over an artifact store, without a metrics exporter.
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self {
            store,
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle for the /metrics endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

/// Form fields for a prediction request. All fields are required; a missing
/// or non-integer field is rejected by the form extractor before the handler
/// runs, with the framework's default response.
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    /// Year the outlet was established.
    pub outlet_establishment_year: i32,
    /// Outlet size label.
    pub outlet_size: String,
    /// Outlet location tier label.
    pub outlet_location_type: String,
    /// Outlet type label.
    pub outlet_type: String,
}

/// Successful prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Predicted sales value.
    pub prediction: f64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Whether the model artifact is loaded.
    pub model_loaded: bool,
    /// Whether the encoder artifact is loaded.
    pub encoders_loaded: bool,
}

/// Encoder metadata response. Label arrays are present only when the encoder
/// artifact is loaded.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    /// Whether the encoder artifact is loaded.
    pub encoders_loaded: bool,
    /// Outlet_Size vocabulary, in fit order.
    #[serde(rename = "Outlet_Size", skip_serializing_if = "Option::is_none")]
    pub outlet_size: Option<Vec<String>>,
    /// Outlet_Location_Type vocabulary, in fit order.
    #[serde(rename = "Outlet_Location_Type", skip_serializing_if = "Option::is_none")]
    pub outlet_location_type: Option<Vec<String>>,
    /// Outlet_Type vocabulary, in fit order.
    #[serde(rename = "Outlet_Type", skip_serializing_if = "Option::is_none")]
    pub outlet_type: Option<Vec<String>>,
}

/// Home page handler - renders the static input form.
pub async fn home() -> impl IntoResponse {
    Html(include_str!("../../templates/index.html"))
}

/// Prediction handler.
pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    state.store.ensure_loaded().await?;

    let model = state.store.model().await.ok_or_else(|| {
        inc_artifact_unavailable();
        ApiError::ModelUnavailable
    })?;
    let encoders = state.store.encoders().await.ok_or_else(|| {
        inc_artifact_unavailable();
        ApiError::EncodersUnavailable
    })?;

    let row = encoding::encode_row(
        &encoders,
        &form.outlet_size,
        &form.outlet_location_type,
        &form.outlet_type,
        form.outlet_establishment_year,
    )
    .map_err(|e| {
        inc_encoding_failures();
        ApiError::from(e)
    })?;

    debug!(?row, "running inference");

    let prediction = model.predict(&row.to_vec()).map_err(|e| {
        inc_prediction_failures();
        ApiError::from(e)
    })?;

    inc_predictions_served();
    record_predict_latency(start);

    Ok(Json(PredictResponse { prediction }))
}

/// Health check handler - reports artifact load state.
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ensure_loaded().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        model_loaded: state.store.model_loaded().await,
        encoders_loaded: state.store.encoders_loaded().await,
    }))
}

/// Metadata handler - reports each encoder's label vocabulary.
pub async fn metadata(
    State(state): State<AppState>,
) -> Result<Json<MetadataResponse>, ApiError> {
    state.store.ensure_loaded().await?;

    let response = match state.store.encoders().await {
        Some(encoders) => {
            let labels = |feature: &str| {
                Some(
                    encoders
                        .get(feature)
                        .map(|e| e.labels())
                        .unwrap_or_default(),
                )
            };

            MetadataResponse {
                encoders_loaded: true,
                outlet_size: labels("Outlet_Size"),
                outlet_location_type: labels("Outlet_Location_Type"),
                outlet_type: labels("Outlet_Type"),
            }
        }
        None => MetadataResponse {
            encoders_loaded: false,
            outlet_size: None,
            outlet_location_type: None,
            outlet_type: None,
        },
    };

    Ok(Json(response))
}

/// Prometheus metrics handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_response_omits_arrays_when_unset() {
        let response = MetadataResponse {
            encoders_loaded: false,
            outlet_size: None,
            outlet_location_type: None,
            outlet_type: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "encoders_loaded": false }));
    }

    #[test]
    fn metadata_response_uses_wire_field_names() {
        let response = MetadataResponse {
            encoders_loaded: true,
            outlet_size: Some(vec!["Small".to_string()]),
            outlet_location_type: Some(vec![]),
            outlet_type: Some(vec![]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["Outlet_Size"], serde_json::json!(["Small"]));
        assert!(json.get("outlet_size").is_none());
    }
}
