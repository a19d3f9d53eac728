//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be decoded as JSON
    InvalidBody(String),
    /// Internal server error outside the pipeline (e.g. a panicked task)
    Internal(String),
    /// Pipeline error
    Service(ServiceError),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ApiError) {
        match self {
            AppError::InvalidBody(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("VALIDATION_ERROR", "request body is not valid JSON").with_details(msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Service(err) => {
                let status = match &err {
                    ServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::ModelNotFound { .. } => StatusCode::NOT_FOUND,
                    ServiceError::DemographicData { .. }
                    | ServiceError::ModelLoad { .. }
                    | ServiceError::Prediction { .. }
                    | ServiceError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = ApiError::new(err.code(), err.to_string());
                let body = match err {
                    ServiceError::Validation { field_errors, .. } if !field_errors.is_empty() => {
                        body.with_details(field_errors.join("; "))
                    }
                    _ => body,
                };
                (status, body)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(code = %error.code, "{}", error.message);
        } else {
            tracing::warn!(code = %error.code, "{}", error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).status_and_body().0
    }

    #[test]
    fn test_service_error_status_mapping() {
        assert_eq!(
            status_of(ServiceError::validation("bad")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ServiceError::DemographicData {
                zipcode: "00000".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ServiceError::ModelNotFound {
                model_name: "x.json".into(),
                path: "model/x.json".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::prediction("nan")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ServiceError::model_load("x.json", "bad")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_field_errors_become_details() {
        let err = ServiceError::invalid_fields(vec!["zipcode: field required".into()]);
        let (_, body) = AppError::from(err).status_and_body();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.details.as_deref(), Some("zipcode: field required"));
    }

    #[test]
    fn test_non_service_errors() {
        let (status, body) = AppError::Internal("Task join error: panicked".into()).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");

        let (status, body) = AppError::InvalidBody("EOF while parsing".into()).status_and_body();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.details.as_deref(), Some("EOF while parsing"));
    }

    #[test]
    fn test_api_error_serialization_skips_empty_details() {
        let json = serde_json::to_value(ApiError::new("INTERNAL_ERROR", "boom")).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["code"], "INTERNAL_ERROR");
    }
}
