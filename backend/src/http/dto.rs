//! Data Transfer Objects for the HTTP API.
//!
//! Prediction responses serialize the domain types directly; only health and
//! reload have HTTP-specific shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::models::{PredictionMetadata, PredictionResult};

/// Query parameters for the reload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReloadQuery {
    /// Artifact file name; defaults to the active model
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Response for a successful reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub model_name: String,
    pub model_version: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub model_loaded: bool,
    pub model_name: String,
    pub model_version: String,
}
