//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use mediagate_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.log_format)?;

    tracing::info!(
        environment = %config.environment,
        production = config.is_production(),
        "Configuration loaded and validated successfully"
    );

    let store =
        mediagate_storage::create_store(&config).context("Failed to configure remote media store")?;

    let state = AppState::new(config.clone(), store);
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
