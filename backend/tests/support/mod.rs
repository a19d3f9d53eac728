#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use house_price_api::config::Settings;
use serde_json::json;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =========================================================
// On-disk fixtures
// =========================================================

/// Features of the fixture models, in training order.
pub const MODEL_FEATURES: &[&str] = &[
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "sqft_above",
    "sqft_basement",
    "ppltn_qty",
    "medn_hshld_incm_amt",
    "hous_val_amt",
];

/// `model.json` intercept; `model_v2.json` adds 10 000.
pub const BASE_INTERCEPT: f64 = 50_000.0;

pub const DEMOGRAPHICS_CSV: &str = "ppltn_qty,medn_hshld_incm_amt,hous_val_amt,zipcode\n\
25495,66051,275000,98001\n\
16289,49238,204300,98002\n\
45911,70375,529600,98103\n";

/// A temp directory laid out like a deployment (`model/`, `data/`) and the
/// settings pointing at it.
pub struct Fixture {
    pub dir: TempDir,
    pub settings: Settings,
}

impl Fixture {
    pub fn models_path(&self) -> &Path {
        &self.settings.model.models_path
    }
}

pub fn model_features() -> Vec<String> {
    MODEL_FEATURES.iter().map(|s| s.to_string()).collect()
}

/// Linear artifact: intercept + 10000·bedrooms + 5000·bathrooms
/// + 100·sqft_living + 0.5·hous_val_amt.
pub fn linear_artifact(intercept: f64, version: Option<&str>) -> serde_json::Value {
    let mut artifact = json!({
        "features": MODEL_FEATURES,
        "estimator": {
            "kind": "linear",
            "intercept": intercept,
            "coefficients": [10000.0, 5000.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5]
        }
    });
    if let Some(v) = version {
        artifact["version"] = json!(v);
    }
    artifact
}

pub fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("model");
    let data = dir.path().join("data");
    fs::create_dir_all(&models).unwrap();
    fs::create_dir_all(&data).unwrap();

    fs::write(
        models.join("model.json"),
        linear_artifact(BASE_INTERCEPT, None).to_string(),
    )
    .unwrap();
    fs::write(
        models.join("model_v2.json"),
        linear_artifact(BASE_INTERCEPT + 10_000.0, Some("0.2.0")).to_string(),
    )
    .unwrap();
    fs::write(
        models.join("model_features.json"),
        serde_json::to_string(MODEL_FEATURES).unwrap(),
    )
    .unwrap();
    fs::write(data.join("zipcode_demographics.csv"), DEMOGRAPHICS_CSV).unwrap();

    let mut settings = Settings::default();
    settings.model.models_path = models;
    settings.data.data_path = data;

    Fixture { dir, settings }
}

/// The example payload used throughout the docs.
pub fn example_payload(zipcode: &str) -> serde_json::Value {
    json!({
        "bedrooms": 3,
        "bathrooms": 2.5,
        "sqft_living": 1560,
        "sqft_lot": 4800,
        "floors": 2,
        "sqft_above": 1560,
        "sqft_basement": 0,
        "zipcode": zipcode,
    })
}

/// `model.json` prediction for [`example_payload`] in 98001.
pub const EXAMPLE_PREDICTION: f64 = 386_000.0;
