//! Service layer: model hosting, feature assembly and the prediction pipeline.
//!
//! Everything here is synchronous. The HTTP layer runs these calls on the
//! blocking thread pool.

pub mod assembler;
pub mod checksum;
pub mod model_host;
pub mod prediction;
pub mod regressor;

pub use assembler::FeatureAssembler;
pub use checksum::calculate_checksum;
pub use model_host::{ModelHandle, ModelHost, ModelOutput};
pub use prediction::PredictionService;
pub use regressor::{
    Estimator, KNeighborsRegressor, LinearRegressor, ModelArtifact, NeighborWeights, RobustScaler,
};
