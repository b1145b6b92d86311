//! Application setup and initialization
//!
//! Validates configuration, initializes telemetry and storage, wires the
//! resize orchestrator and builds the router.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use anyhow::Result;
use axum::Router;
use resizer_core::Config;
use std::sync::Arc;

use crate::state::AppState;

/// Initialize the application and return the shared state and router
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    resizer_infra::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config)?;

    tracing::info!(
        environment = %config.environment(),
        port = config.server_port(),
        "Starting Resizer API"
    );

    let storage = storage::setup_storage(&config).await?;
    let state = services::initialize_services(&config, storage)?;
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
