//! House price HTTP server binary.
//!
//! Loads settings, the demographic reference table and the initial model,
//! then serves the REST API. Any load failure exits before the listener binds.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin house-price-server
//!
//! # Explicit settings file and port
//! HOUSE_PRICE_CONFIG=house_price.toml PORT=9000 cargo run --bin house-price-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOUSE_PRICE_CONFIG`: settings file (default: search for `house_price.toml`)
//! - `HOST` / `PORT`: bind address (default: 0.0.0.0:8000)
//! - `WORKERS`: runtime worker threads (default: 2 * cores + 1)
//! - `MODELS_PATH` / `MODEL_NAME` / `MODEL_VERSION`: model artifact selection
//! - `DATA_PATH`: directory holding the demographic table
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use house_price_api::config::Settings;
use house_price_api::http::{bind_listener, create_router, AppState};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting house price prediction server");

    let settings = Settings::load().context("Failed to load settings")?;
    let workers = settings.worker_threads();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    info!(workers, "Runtime initialized");

    runtime.block_on(serve(settings))
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let startup_settings = settings.clone();
    let state = tokio::task::spawn_blocking(move || AppState::from_settings(&startup_settings))
        .await
        .context("Startup task failed")?
        .context("Failed to load model or demographic data")?;

    let model = state.service.host().current_info();
    info!(
        model_name = %model.name,
        model_version = %model.version,
        "Prediction service ready"
    );

    let app = create_router(state);

    let listener = bind_listener(&settings.server.host, settings.server.port)
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                settings.server.host, settings.server.port
            )
        })?;
    let addr = listener.local_addr()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
