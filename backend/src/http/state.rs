//! Application state for the HTTP server.

use std::sync::Arc;

use crate::bootstrap::build_prediction_service;
use crate::config::Settings;
use crate::error::ServiceResult;
use crate::models::InputSchema;
use crate::services::PredictionService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline (model host + feature assembler)
    pub service: PredictionService,
    /// Schema for `POST /predict`
    pub primary_schema: Arc<InputSchema>,
    /// Schema for `POST /predict_bonus`
    pub sales_schema: Arc<InputSchema>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(service: PredictionService, primary_schema: InputSchema, sales_schema: InputSchema) -> Self {
        Self {
            service,
            primary_schema: Arc::new(primary_schema),
            sales_schema: Arc::new(sales_schema),
        }
    }

    /// Load the model and reference table named by `settings`.
    pub fn from_settings(settings: &Settings) -> ServiceResult<Self> {
        let service = build_prediction_service(settings)?;
        Ok(Self::new(
            service,
            settings.endpoints.primary.clone(),
            settings.endpoints.sales.clone(),
        ))
    }
}
