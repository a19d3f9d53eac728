//! Endpoint input schemas.
//!
//! A schema is configuration: an ordered list of accepted numeric fields plus
//! the name of the ZIP code field. Validation turns an arbitrary JSON body into
//! a [`PropertyRecord`], collecting every field problem before failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::property::{json_type_name, PropertyRecord, ZipCode};
use crate::error::{ServiceError, ServiceResult};

/// Name of the ZIP code field in every shipped schema.
pub const ZIPCODE_FIELD: &str = "zipcode";

/// Fields accepted by `POST /predict`.
pub const PRIMARY_INPUT_FIELDS: &[&str] = &[
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "sqft_above",
    "sqft_basement",
    "zipcode",
];

/// Numeric columns of the sales history accepted by `POST /predict_bonus`.
pub const SALES_INPUT_FIELDS: &[&str] = &[
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "waterfront",
    "view",
    "condition",
    "grade",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "zipcode",
    "lat",
    "long",
    "sqft_living15",
    "sqft_lot15",
];

/// Input schema for one prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Schema name used in logs
    pub name: String,
    /// Accepted fields, in projection order (includes the ZIP field)
    pub input_fields: Vec<String>,
    /// Field holding the join key
    #[serde(default = "default_zip_field")]
    pub zip_field: String,
    /// Feature projection for this endpoint; falls back to the service-wide
    /// required feature list when unset
    #[serde(default)]
    pub required_features: Option<Vec<String>>,
}

fn default_zip_field() -> String {
    ZIPCODE_FIELD.to_string()
}

impl InputSchema {
    pub fn new(name: impl Into<String>, input_fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            input_fields: input_fields.iter().map(|s| s.to_string()).collect(),
            zip_field: default_zip_field(),
            required_features: None,
        }
    }

    /// Schema served by `POST /predict`.
    pub fn primary() -> Self {
        Self::new("primary", PRIMARY_INPUT_FIELDS)
    }

    /// Schema served by `POST /predict_bonus`.
    pub fn sales() -> Self {
        Self::new("sales", SALES_INPUT_FIELDS)
    }

    pub fn with_required_features(mut self, features: Vec<String>) -> Self {
        self.required_features = Some(features);
        self
    }

    /// Check the schema itself is usable.
    pub fn check(&self) -> ServiceResult<()> {
        if !self.input_fields.iter().any(|f| f == &self.zip_field) {
            return Err(ServiceError::configuration(format!(
                "schema '{}' does not list its ZIP field '{}'",
                self.name, self.zip_field
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for field in &self.input_fields {
            if !seen.insert(field.as_str()) {
                return Err(ServiceError::configuration(format!(
                    "schema '{}' lists field '{}' twice",
                    self.name, field
                )));
            }
        }
        Ok(())
    }

    /// Validate a JSON body and project it onto this schema.
    ///
    /// Unknown fields are ignored. Missing or `null` numeric fields become
    /// `None`; the ZIP field is required.
    pub fn validate(&self, body: &Value) -> ServiceResult<PropertyRecord> {
        let object = body.as_object().ok_or_else(|| {
            ServiceError::validation(format!(
                "request body must be a JSON object, got {}",
                json_type_name(body)
            ))
        })?;

        let mut errors = Vec::new();
        let mut zipcode = None;
        let mut fields = Vec::with_capacity(self.input_fields.len());

        for name in &self.input_fields {
            let value = object.get(name).unwrap_or(&Value::Null);

            if name == &self.zip_field {
                match value {
                    Value::Null => errors.push(format!("{}: field required", name)),
                    other => match ZipCode::from_json(other) {
                        Ok(zip) => zipcode = Some(zip),
                        Err(e) => errors.push(format!("{}: {}", name, validation_message(&e))),
                    },
                }
                continue;
            }

            match numeric_value(value) {
                Ok(v) => fields.push((name.clone(), v)),
                Err(msg) => errors.push(format!("{}: {}", name, msg)),
            }
        }

        if !errors.is_empty() {
            return Err(ServiceError::invalid_fields(errors));
        }

        match zipcode {
            Some(zip) => Ok(PropertyRecord::new(zip, fields)),
            None => Err(ServiceError::invalid_fields(vec![format!(
                "{}: field required",
                self.zip_field
            )])),
        }
    }
}

fn numeric_value(value: &Value) -> Result<Option<f64>, String> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => {
            return Err(format!("expected a number, got {}", json_type_name(other)));
        }
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("expected a finite number, got {}", value)),
    }
}

fn validation_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Validation { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
