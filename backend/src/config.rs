//! Service configuration.
//!
//! Settings come from a TOML file with every field defaulted, then
//! environment variables override individual values.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ServiceError, ServiceResult};
use crate::models::InputSchema;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "HOUSE_PRICE_CONFIG";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub endpoints: EndpointSettings,
}

/// Listener and runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Runtime worker threads; `0` means `2 * cores + 1`
    #[serde(default)]
    pub workers: usize,
}

/// Model artifact settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_models_path")]
    pub models_path: PathBuf,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Version reported for artifacts that do not carry one
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// JSON list of required feature names, relative to `models_path`
    #[serde(default = "default_features_file")]
    pub features_file: Option<String>,
}

/// Reference data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_demographics_file")]
    pub demographics_file: String,
    #[serde(default = "default_zip_column")]
    pub zip_column: String,
}

/// Input schemas for the two prediction endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSettings {
    #[serde(default = "InputSchema::primary")]
    pub primary: InputSchema,
    #[serde(default = "InputSchema::sales")]
    pub sales: InputSchema,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_models_path() -> PathBuf {
    PathBuf::from("model")
}

fn default_model_name() -> String {
    "model.json".to_string()
}

fn default_model_version() -> String {
    "0.1.0".to_string()
}

fn default_features_file() -> Option<String> {
    Some("model_features.json".to_string())
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_demographics_file() -> String {
    "zipcode_demographics.csv".to_string()
}

fn default_zip_column() -> String {
    "zipcode".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            models_path: default_models_path(),
            model_name: default_model_name(),
            model_version: default_model_version(),
            features_file: default_features_file(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            demographics_file: default_demographics_file(),
            zip_column: default_zip_column(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            primary: InputSchema::primary(),
            sales: InputSchema::sales(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ServiceError::configuration(format!(
                "failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ServiceResult<Self> {
        toml::from_str(content)
            .map_err(|e| ServiceError::configuration(format!("failed to parse config file: {}", e)))
    }

    /// Resolve settings the way the server does at startup.
    ///
    /// Uses the file named by `HOUSE_PRICE_CONFIG` if set, else the first
    /// `house_price.toml` found in the current directory, `backend/` or the
    /// parent directory, else defaults. Environment overrides apply last.
    pub fn load() -> ServiceResult<Self> {
        let mut settings = match env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let search_paths = [
                    PathBuf::from("house_price.toml"),
                    PathBuf::from("backend/house_price.toml"),
                    PathBuf::from("../house_price.toml"),
                ];
                match search_paths.iter().find(|p| p.exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `HOST`, `PORT`, `WORKERS`, `MODELS_PATH`, `DATA_PATH`,
    /// `MODEL_NAME` and `MODEL_VERSION` overrides.
    pub fn apply_env_overrides(&mut self) -> ServiceResult<()> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ServiceError::configuration("PORT must be a valid port number"))?;
        }
        if let Ok(workers) = env::var("WORKERS") {
            self.server.workers = workers
                .parse()
                .map_err(|_| ServiceError::configuration("WORKERS must be a non-negative integer"))?;
        }
        if let Ok(path) = env::var("MODELS_PATH") {
            self.model.models_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("DATA_PATH") {
            self.data.data_path = PathBuf::from(path);
        }
        if let Ok(name) = env::var("MODEL_NAME") {
            self.model.model_name = name;
        }
        if let Ok(version) = env::var("MODEL_VERSION") {
            self.model.model_version = version;
        }
        Ok(())
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.model.model_name.trim().is_empty() {
            return Err(ServiceError::configuration("model.model_name must not be empty"));
        }
        self.endpoints.primary.check()?;
        self.endpoints.sales.check()?;
        Ok(())
    }

    /// Runtime worker threads, resolving `0` to `2 * cores + 1`.
    pub fn worker_threads(&self) -> usize {
        if self.server.workers > 0 {
            return self.server.workers;
        }
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        2 * cores + 1
    }

    pub fn demographics_path(&self) -> PathBuf {
        self.data.data_path.join(&self.data.demographics_file)
    }

    pub fn features_path(&self) -> Option<PathBuf> {
        self.model
            .features_file
            .as_ref()
            .map(|file| self.model.models_path.join(file))
    }
}

/// Read a JSON array of feature names.
pub fn read_feature_list(path: &Path) -> ServiceResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        ServiceError::configuration(format!("failed to read feature list {}: {}", path.display(), e))
    })?;
    let features: Vec<String> = serde_json::from_str(&content).map_err(|e| {
        ServiceError::configuration(format!("feature list {} is not a JSON array of names: {}", path.display(), e))
    })?;
    if features.is_empty() {
        return Err(ServiceError::configuration(format!(
            "feature list {} is empty",
            path.display()
        )));
    }
    Ok(features)
}
