//! Caller-submitted property data and its ZIP code join key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ServiceError, ServiceResult};

/// Minimum rendered width; shorter values are zero-padded.
const ZIP_WIDTH: usize = 5;

/// Normalized ZIP code used to join requests with demographic rows.
///
/// Requests and the reference table disagree on representation (`"00501"`,
/// `501`, `"501.0"`), so both sides go through [`ZipCode::parse_str`] or
/// [`ZipCode::from_json`]. Two ZIP codes are equal when their numeric values
/// are; the canonical form is that value zero-padded to five digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZipCode(String);

impl ZipCode {
    /// Parse a textual ZIP code. Integral float renderings (`"98001.0"`) are
    /// accepted because CSV readers and JSON encoders produce them.
    pub fn parse_str(raw: &str) -> ServiceResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::validation("ZIP code must not be empty"));
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed.parse::<u32>().map(Self::from_integer).map_err(|_| {
                ServiceError::validation(format!("ZIP code '{}' is out of range", trimmed))
            });
        }

        match trimmed.parse::<f64>() {
            Ok(value) if trimmed.contains('.') => Self::from_number(value),
            _ => Err(ServiceError::validation(format!(
                "ZIP code '{}' must contain only digits",
                trimmed
            ))),
        }
    }

    /// Build a ZIP code from a JSON number. Must be a non-negative integer.
    pub fn from_number(value: f64) -> ServiceResult<Self> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(ServiceError::validation(format!(
                "ZIP code {} must be a non-negative integer",
                value
            )));
        }
        Ok(Self::from_integer(value as u32))
    }

    fn from_integer(value: u32) -> Self {
        Self(format!("{:0width$}", value, width = ZIP_WIDTH))
    }

    /// Extract a ZIP code from an arbitrary JSON value.
    pub fn from_json(value: &serde_json::Value) -> ServiceResult<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse_str(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Self::from_number(v),
                None => Err(ServiceError::validation("ZIP code is not a representable number")),
            },
            other => Err(ServiceError::validation(format!(
                "ZIP code must be a string or a number, got {}",
                json_type_name(other)
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caller-submitted property projected onto an input schema.
///
/// Field order is the schema's order; a `None` value means the caller sent
/// `null` or omitted the field.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub zipcode: ZipCode,
    pub fields: Vec<(String, Option<f64>)>,
}

impl PropertyRecord {
    pub fn new(zipcode: ZipCode, fields: Vec<(String, Option<f64>)>) -> Self {
        Self { zipcode, fields }
    }

    /// Value of a field, `None` when absent from the record or null.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| *value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
