//! Serialized regression models.
//!
//! An artifact is a small pipeline: an optional robust scaler followed by one
//! estimator. Artifacts are JSON so they can be exported from any training
//! environment and inspected by hand.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ServiceError, ServiceResult};

/// A trained model as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Version string; the configured model version is used when absent
    #[serde(default)]
    pub version: Option<String>,
    /// Training-time feature order
    pub features: Vec<String>,
    #[serde(default)]
    pub scaler: Option<RobustScaler>,
    pub estimator: Estimator,
}

/// Per-feature `(x - center) / scale` transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustScaler {
    pub center: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearRegressor),
    KNeighbors(KNeighborsRegressor),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNeighborsRegressor {
    pub n_neighbors: usize,
    #[serde(default)]
    pub weights: NeighborWeights,
    /// Training rows, already in scaled space
    pub samples: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborWeights {
    #[default]
    Uniform,
    Distance,
}

impl ModelArtifact {
    /// Parse and validate an artifact.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let artifact: ModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid model JSON: {}", e))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the pipeline's shapes agree with its feature list.
    pub fn validate(&self) -> Result<(), String> {
        let width = self.features.len();
        if width == 0 {
            return Err("model declares no features".to_string());
        }
        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.as_str()) {
                return Err(format!("feature '{}' is declared twice", feature));
            }
        }

        if let Some(scaler) = &self.scaler {
            if scaler.center.len() != width || scaler.scale.len() != width {
                return Err(format!(
                    "scaler has {} centers and {} scales for {} features",
                    scaler.center.len(),
                    scaler.scale.len(),
                    width
                ));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err("scaler scale values must be finite and non-zero".to_string());
            }
        }

        match &self.estimator {
            Estimator::Linear(linear) => {
                if linear.coefficients.len() != width {
                    return Err(format!(
                        "linear model has {} coefficients for {} features",
                        linear.coefficients.len(),
                        width
                    ));
                }
            }
            Estimator::KNeighbors(knn) => {
                if knn.samples.is_empty() {
                    return Err("k-neighbors model has no samples".to_string());
                }
                if knn.samples.len() != knn.targets.len() {
                    return Err(format!(
                        "k-neighbors model has {} samples but {} targets",
                        knn.samples.len(),
                        knn.targets.len()
                    ));
                }
                if knn.n_neighbors == 0 || knn.n_neighbors > knn.samples.len() {
                    return Err(format!(
                        "n_neighbors must be between 1 and {}, got {}",
                        knn.samples.len(),
                        knn.n_neighbors
                    ));
                }
                if let Some(row) = knn.samples.iter().position(|s| s.len() != width) {
                    return Err(format!(
                        "sample {} has {} values for {} features",
                        row,
                        knn.samples[row].len(),
                        width
                    ));
                }
            }
        }
        Ok(())
    }

    /// Run the pipeline on one row of features in training order.
    pub fn predict(&self, row: &[f64]) -> ServiceResult<f64> {
        if row.len() != self.features.len() {
            return Err(ServiceError::prediction(format!(
                "expected {} feature values, got {}",
                self.features.len(),
                row.len()
            )));
        }

        let scaled: Vec<f64> = match &self.scaler {
            Some(scaler) => row
                .iter()
                .zip(scaler.center.iter().zip(scaler.scale.iter()))
                .map(|(x, (center, scale))| (x - center) / scale)
                .collect(),
            None => row.to_vec(),
        };

        let value = match &self.estimator {
            Estimator::Linear(linear) => linear.predict(&scaled),
            Estimator::KNeighbors(knn) => knn.predict(&scaled),
        };

        if !value.is_finite() {
            return Err(ServiceError::prediction(format!(
                "model produced a non-finite prediction ({})",
                value
            )));
        }
        Ok(value)
    }
}

impl LinearRegressor {
    fn predict(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(coef, value)| coef * value)
                .sum::<f64>()
    }
}

impl KNeighborsRegressor {
    fn predict(&self, x: &[f64]) -> f64 {
        let mut neighbors: Vec<(f64, f64)> = self
            .samples
            .iter()
            .zip(&self.targets)
            .map(|(sample, target)| (euclidean(sample, x), *target))
            .collect();
        // Stable sort keeps training order among equidistant samples.
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(self.n_neighbors);

        match self.weights {
            NeighborWeights::Uniform => mean(neighbors.iter().map(|(_, t)| *t)),
            NeighborWeights::Distance => {
                let exact: Vec<f64> = neighbors
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, t)| *t)
                    .collect();
                if !exact.is_empty() {
                    return mean(exact.into_iter());
                }
                let (weighted, total) = neighbors
                    .iter()
                    .fold((0.0, 0.0), |(sum, w), (d, t)| (sum + t / d, w + 1.0 / d));
                weighted / total
            }
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / count as f64
}
