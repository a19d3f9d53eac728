//! Domain types shared by the pipeline and the HTTP layer.

pub mod features;
pub mod prediction;
pub mod property;
pub mod schema;

pub use features::FeatureVector;
pub use prediction::{round2, ModelInfo, PredictionMetadata, PredictionResult};
pub use property::{PropertyRecord, ZipCode};
pub use schema::{InputSchema, PRIMARY_INPUT_FIELDS, SALES_INPUT_FIELDS, ZIPCODE_FIELD};
