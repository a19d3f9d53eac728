//! Blocking prediction pipeline behind the HTTP handlers.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::assembler::FeatureAssembler;
use super::model_host::{ModelHandle, ModelHost};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{round2, InputSchema, PredictionMetadata, PredictionResult};

/// Validate → assemble → predict, for any input schema.
#[derive(Clone)]
pub struct PredictionService {
    host: Arc<ModelHost>,
    assembler: FeatureAssembler,
}

impl PredictionService {
    pub fn new(host: Arc<ModelHost>, assembler: FeatureAssembler) -> Self {
        Self { host, assembler }
    }

    pub fn host(&self) -> &Arc<ModelHost> {
        &self.host
    }

    /// Feature projection for `schema` against the model active right now.
    pub fn required_features_for(&self, schema: &InputSchema) -> Vec<String> {
        self.host.with_active(|handle| projection(schema, handle))
    }

    pub fn predict(&self, schema: &InputSchema, body: &Value) -> ServiceResult<PredictionResult> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        let record = schema.validate(body)?;
        // Projection and inference must see the same model across a reload
        let (required, output) = self.host.with_active(|handle| {
            let required = projection(schema, handle);
            let features = self.assembler.assemble(&record, &required)?;
            let output = handle.predict(&features)?;
            Ok::<_, ServiceError>((required, output))
        })?;

        let prediction_time_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
        tracing::debug!(
            %request_id,
            schema = %schema.name,
            zipcode = %record.zipcode,
            model_name = %output.model.name,
            prediction = output.value,
            prediction_time_ms,
            "Prediction served"
        );

        Ok(PredictionResult {
            prediction: round2(output.value),
            timestamp: Utc::now(),
            model_name: output.model.name,
            model_version: output.model.version,
            metadata: PredictionMetadata {
                prediction_time_ms,
                features_used: required,
                request_id,
            },
        })
    }
}

/// The schema's own feature list, else the active model's. A configured
/// service-wide list is pinned on the host, so it always equals the latter.
fn projection(schema: &InputSchema, handle: &ModelHandle) -> Vec<String> {
    match &schema.required_features {
        Some(features) => features.clone(),
        None => handle.artifact.features.clone(),
    }
}
