//! Holder of the active model with atomic hot reload.
//!
//! Exactly one [`ModelHandle`] is active. `predict`, [`ModelHost::with_active`]
//! and the handle swap in `reload` share a single exclusive lock, so a
//! prediction always runs against one complete model and reports that model's
//! identity. Parsing a new artifact happens before the lock is taken; only the
//! swap is exclusive.

use chrono::Utc;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::checksum::calculate_checksum;
use super::regressor::ModelArtifact;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{FeatureVector, ModelInfo};

/// A loaded artifact and its identity. Replaced wholesale, never mutated.
#[derive(Debug)]
pub struct ModelHandle {
    pub info: ModelInfo,
    pub artifact: ModelArtifact,
}

impl ModelHandle {
    /// Run this model on `features`, which must match its feature names and
    /// order exactly.
    pub fn predict(&self, features: &FeatureVector) -> ServiceResult<ModelOutput> {
        features.ensure_matches(&self.artifact.features)?;
        let value = self.artifact.predict(features.values())?;
        Ok(ModelOutput {
            value,
            model: self.info.clone(),
        })
    }
}

/// Raw model output plus the identity of the model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub value: f64,
    pub model: ModelInfo,
}

pub struct ModelHost {
    models_path: PathBuf,
    default_version: String,
    /// Feature list every active model must be trained on, when configured
    required_features: Option<Vec<String>>,
    active: Mutex<Arc<ModelHandle>>,
}

impl ModelHost {
    /// Load the initial model. Failure here must keep the service from starting.
    pub fn load(
        models_path: impl Into<PathBuf>,
        model_name: &str,
        default_version: impl Into<String>,
    ) -> ServiceResult<Self> {
        let models_path = models_path.into();
        let default_version = default_version.into();
        let path = resolve_artifact(&models_path, model_name)?;
        let handle = read_handle(&path, model_name, &default_version)?;

        tracing::info!(
            model_name = %handle.info.name,
            model_version = %handle.info.version,
            checksum = %handle.info.checksum,
            features = handle.artifact.features.len(),
            "Model loaded"
        );

        Ok(Self {
            models_path,
            default_version,
            required_features: None,
            active: Mutex::new(Arc::new(handle)),
        })
    }

    /// Pin the feature list. The current model must already match it, and
    /// later reloads reject artifacts trained on anything else.
    pub fn require_features(mut self, features: Vec<String>) -> ServiceResult<Self> {
        let current = self.current_info().name;
        if self.feature_names() != features {
            return Err(ServiceError::configuration(format!(
                "required feature list does not match the features of model {}",
                current
            )));
        }
        self.required_features = Some(features);
        Ok(self)
    }

    /// Run `f` against the active model while holding the exclusive lock.
    ///
    /// Work that must see a single model from start to finish (feature
    /// projection followed by inference) goes through here.
    pub fn with_active<R>(&self, f: impl FnOnce(&ModelHandle) -> R) -> R {
        let active = self.active.lock();
        f(&active)
    }

    /// Run the active model on `features`.
    pub fn predict(&self, features: &FeatureVector) -> ServiceResult<ModelOutput> {
        self.with_active(|handle| handle.predict(features))
    }

    /// Replace the active model with `model_name` from the model directory.
    ///
    /// On any error the previous model stays active.
    pub fn reload(&self, model_name: &str) -> ServiceResult<ModelInfo> {
        let path = resolve_artifact(&self.models_path, model_name)?;
        let handle = Arc::new(read_handle(&path, model_name, &self.default_version)?);
        if let Some(required) = &self.required_features {
            if &handle.artifact.features != required {
                tracing::warn!(
                    model_name = %handle.info.name,
                    "Rejected reload: model features differ from the required feature list"
                );
                return Err(ServiceError::model_load(
                    handle.info.name.as_str(),
                    format!(
                        "model features [{}] differ from the required features [{}]",
                        handle.artifact.features.join(", "),
                        required.join(", ")
                    ),
                ));
            }
        }
        let info = handle.info.clone();

        let previous = std::mem::replace(&mut *self.active.lock(), handle);

        tracing::info!(
            previous = %previous.info.name,
            model_name = %info.name,
            model_version = %info.version,
            checksum = %info.checksum,
            "Model reloaded"
        );
        Ok(info)
    }

    pub fn current_info(&self) -> ModelInfo {
        self.active.lock().info.clone()
    }

    /// Feature names of the active model, in training order.
    pub fn feature_names(&self) -> Vec<String> {
        self.active.lock().artifact.features.clone()
    }

    /// A host only exists once its initial model loaded.
    pub fn is_loaded(&self) -> bool {
        true
    }
}

/// Reject anything but a bare file name, then require the file to exist.
fn resolve_artifact(models_path: &Path, model_name: &str) -> ServiceResult<PathBuf> {
    let trimmed = model_name.trim();
    let is_plain_name = !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\'])
        && Path::new(trimmed).file_name().map(|n| n == trimmed).unwrap_or(false);
    if !is_plain_name {
        return Err(ServiceError::validation(format!(
            "model name '{}' must be a plain file name",
            model_name
        )));
    }

    let path = models_path.join(trimmed);
    if !path.is_file() {
        return Err(ServiceError::ModelNotFound {
            model_name: trimmed.to_string(),
            path: path.display().to_string(),
        });
    }
    Ok(path)
}

fn read_handle(path: &Path, model_name: &str, default_version: &str) -> ServiceResult<ModelHandle> {
    let name = model_name.trim();
    let bytes = fs::read(path)
        .map_err(|e| ServiceError::model_load(name, format!("failed to read {}: {}", path.display(), e)))?;
    let artifact = ModelArtifact::from_slice(&bytes).map_err(|e| ServiceError::model_load(name, e))?;

    let info = ModelInfo {
        name: name.to_string(),
        version: artifact
            .version
            .clone()
            .unwrap_or_else(|| default_version.to_string()),
        checksum: calculate_checksum(&bytes),
        loaded_at: Utc::now(),
    };
    Ok(ModelHandle { info, artifact })
}

#[cfg(test)]
#[path = "model_host_tests.rs"]
mod model_host_tests;
