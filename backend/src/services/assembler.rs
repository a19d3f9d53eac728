//! Feature assembly: left-join a property record with its demographic row and
//! project the result onto the model's required features.

use std::sync::Arc;

use crate::demographics::DemographicLookup;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{FeatureVector, PropertyRecord};

#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    lookup: Arc<DemographicLookup>,
}

impl FeatureAssembler {
    pub fn new(lookup: Arc<DemographicLookup>) -> Self {
        Self { lookup }
    }

    /// Build the feature vector for `record` in `required` order.
    ///
    /// Property fields take precedence over demographic columns of the same
    /// name. The ZIP code is only a join key and is never a feature.
    pub fn assemble(&self, record: &PropertyRecord, required: &[String]) -> ServiceResult<FeatureVector> {
        let demographics = self.lookup.lookup(&record.zipcode)?;

        let mut values = Vec::with_capacity(required.len());
        for feature in required {
            let joined = record
                .fields
                .iter()
                .find(|(name, _)| name == feature)
                .map(|(_, value)| *value)
                .or_else(|| demographics.column(feature));

            match joined {
                Some(Some(value)) => values.push(value),
                Some(None) => {
                    return Err(ServiceError::validation(format!(
                        "feature '{}' is required by the model but has no value for ZIP code {}",
                        feature, record.zipcode
                    )))
                }
                None => {
                    return Err(ServiceError::prediction(format!(
                        "feature '{}' is neither an input field nor a demographic column",
                        feature
                    )))
                }
            }
        }

        FeatureVector::new(required.to_vec(), values)
    }
}
