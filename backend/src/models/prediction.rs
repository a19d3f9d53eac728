//! Prediction results and model identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a loaded model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Artifact file name inside the model directory
    pub name: String,
    pub version: String,
    /// SHA-256 of the artifact bytes
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

/// Timing and provenance attached to every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetadata {
    pub prediction_time_ms: f64,
    pub features_used: Vec<String>,
    pub request_id: Uuid,
}

/// Outcome of one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted price in USD, rounded to cents
    pub prediction: f64,
    pub timestamp: DateTime<Utc>,
    pub model_name: String,
    pub model_version: String,
    pub metadata: PredictionMetadata,
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
