//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! prediction service. Model and CSV work is CPU/file bound, so it runs on the
//! blocking pool.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use super::dto::{HealthResponse, PredictionResult, ReloadQuery, ReloadResponse};
use super::error::AppError;
use super::state::AppState;
use crate::models::InputSchema;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Liveness plus the identity of the active model.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let host = state.service.host();
    let info = host.current_info();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        model_loaded: host.is_loaded(),
        model_name: info.name,
        model_version: info.version,
    }))
}

// =============================================================================
// Prediction
// =============================================================================

/// POST /predict
///
/// Predict a price from the primary property schema.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<PredictionResult> {
    let schema = Arc::clone(&state.primary_schema);
    run_prediction(state, schema, payload).await
}

/// POST /predict_bonus
///
/// Predict a price from a sales-history row.
pub async fn predict_bonus(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<PredictionResult> {
    let schema = Arc::clone(&state.sales_schema);
    run_prediction(state, schema, payload).await
}

async fn run_prediction(
    state: AppState,
    schema: Arc<InputSchema>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<PredictionResult> {
    let Json(body) = payload?;
    let service = state.service.clone();

    let result = tokio::task::spawn_blocking(move || service.predict(&schema, &body))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(result))
}

// =============================================================================
// Model Management
// =============================================================================

/// GET|POST /reload_model?model_name=<name>
///
/// Swap the active model. Without `model_name` the current artifact is
/// re-read from disk.
pub async fn reload_model(
    State(state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> HandlerResult<ReloadResponse> {
    let host = Arc::clone(state.service.host());
    let model_name = query
        .model_name
        .unwrap_or_else(|| host.current_info().name);

    let info = tokio::task::spawn_blocking(move || host.reload(&model_name))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(ReloadResponse {
        status: "reloaded".to_string(),
        model_name: info.name,
        model_version: info.version,
    }))
}
