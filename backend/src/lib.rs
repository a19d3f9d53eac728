//! # House Price API
//!
//! Real-time house price predictions over HTTP.
//!
//! A caller posts a property record; the service joins it with static
//! per-ZIP-code demographic attributes, projects the joined row onto the
//! features the trained model expects, and returns the model's prediction.
//! The model can be hot-swapped without restarting the process.
//!
//! ## Architecture
//!
//! - [`models`]: property records, ZIP codes, input schemas, feature vectors
//!   and prediction results
//! - [`demographics`]: the ZIP-code reference table (loaded with Polars)
//! - [`services`]: model artifacts, the model host, feature assembly and the
//!   prediction pipeline
//! - [`config`]: TOML settings with environment overrides
//! - [`bootstrap`]: startup wiring from settings to a ready pipeline
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod bootstrap;
pub mod config;
pub mod demographics;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ServiceError, ServiceResult};
