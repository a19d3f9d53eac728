//! Error types for the prediction pipeline.
//!
//! Every failure that can happen between receiving a request body and
//! producing a prediction is one of the [`ServiceError`] variants. The HTTP
//! layer maps each variant to a status code; nothing below it knows about HTTP.

/// Result type for pipeline operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for the prediction pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Request body is malformed or incomplete.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// Per-field problems, when the failure came from schema validation.
        field_errors: Vec<String>,
    },

    /// The ZIP code has no row in the demographic reference table.
    #[error("Demographic data error: no demographic data found for ZIP code {zipcode}")]
    DemographicData { zipcode: String },

    /// Reload target does not exist in the model directory.
    #[error("Model not found: {model_name} (looked in {path})")]
    ModelNotFound { model_name: String, path: String },

    /// Artifact exists but cannot be read or is not a valid model.
    #[error("Model load error: {model_name}: {message}")]
    ModelLoad { model_name: String, message: String },

    /// Failure inside model invocation, including feature schema mismatches.
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// Settings, reference table or feature list are unusable.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Validation failure carrying one entry per offending field.
    pub fn invalid_fields(field_errors: Vec<String>) -> Self {
        let message = format!("{} invalid field(s) in request body", field_errors.len());
        Self::Validation {
            message,
            field_errors,
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn model_load(model_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            model_name: model_name.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::DemographicData { .. } => "DEMOGRAPHIC_DATA_ERROR",
            Self::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            Self::ModelLoad { .. } => "MODEL_LOAD_ERROR",
            Self::Prediction { .. } => "PREDICTION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}
