//! Startup wiring: settings → reference table, model host and pipeline.
//!
//! Any error returned here is fatal; the server must not bind its listener
//! without a model and a demographic table.

use std::sync::Arc;

use crate::config::{read_feature_list, Settings};
use crate::demographics::read_demographics_csv;
use crate::error::{ServiceError, ServiceResult};
use crate::services::{FeatureAssembler, ModelHost, PredictionService};

/// Load everything the prediction pipeline needs.
pub fn build_prediction_service(settings: &Settings) -> ServiceResult<PredictionService> {
    let lookup = read_demographics_csv(&settings.demographics_path(), &settings.data.zip_column)?;
    if lookup.is_empty() {
        return Err(ServiceError::configuration(format!(
            "demographic table {} has no rows",
            settings.demographics_path().display()
        )));
    }

    let host = ModelHost::load(
        &settings.model.models_path,
        &settings.model.model_name,
        settings.model.model_version.clone(),
    )?;

    let host = match settings.features_path() {
        Some(path) if path.is_file() => {
            let features = read_feature_list(&path)?;
            let count = features.len();
            let host = host.require_features(features)?;
            tracing::info!(path = %path.display(), count, "Loaded required feature list");
            host
        }
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "Feature list not found; using the active model's features"
            );
            host
        }
        None => host,
    };

    Ok(PredictionService::new(
        Arc::new(host),
        FeatureAssembler::new(Arc::new(lookup)),
    ))
}
