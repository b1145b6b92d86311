//! Service initialization

use anyhow::{Context, Result};
use resizer_core::Config;
use resizer_infra::ReqwestFetcher;
use resizer_processing::ImageTransformer;
use resizer_storage::BlobStore;
use resizer_worker::ResizeOrchestrator;
use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Wire the orchestrator to its fetcher, transformer and blob store.
pub fn initialize_services(config: &Config, storage: Arc<dyn BlobStore>) -> Result<Arc<AppState>> {
    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(
        config.http_client_timeout_secs(),
    ))
    .context("Failed to build HTTP client")?;

    let fallback = config.fallback();
    if let Some(fallback) = &fallback {
        tracing::info!(
            format = %fallback.format,
            size = ?fallback.size,
            "Fallback variant enabled"
        );
    }

    let orchestrator = ResizeOrchestrator::new(
        Arc::new(fetcher),
        Arc::new(ImageTransformer::new()),
        storage,
        fallback,
    );

    Ok(Arc::new(AppState::new(config.clone(), orchestrator)))
}
