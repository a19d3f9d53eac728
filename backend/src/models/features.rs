//! Ordered feature vectors handed to the model.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Ordered `(name, value)` pairs in the model's training-time feature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(names: Vec<String>, values: Vec<f64>) -> ServiceResult<Self> {
        if names.len() != values.len() {
            return Err(ServiceError::prediction(format!(
                "feature vector has {} names but {} values",
                names.len(),
                values.len()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    /// Fail unless the names equal `expected`, element for element.
    pub fn ensure_matches(&self, expected: &[String]) -> ServiceResult<()> {
        if self.names.as_slice() == expected {
            return Ok(());
        }

        let missing: Vec<&str> = expected
            .iter()
            .filter(|f| !self.names.contains(f))
            .map(String::as_str)
            .collect();
        let unexpected: Vec<&str> = self
            .names
            .iter()
            .filter(|f| !expected.contains(f))
            .map(String::as_str)
            .collect();

        let detail = if missing.is_empty() && unexpected.is_empty() {
            "feature order differs from the model's training order".to_string()
        } else {
            format!(
                "missing features [{}], unexpected features [{}]",
                missing.join(", "),
                unexpected.join(", ")
            )
        };
        Err(ServiceError::prediction(format!(
            "feature vector does not match model schema: {}",
            detail
        )))
    }
}
