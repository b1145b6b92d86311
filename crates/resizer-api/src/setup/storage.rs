//! Storage setup and initialization

use anyhow::{Context, Result};
use resizer_core::Config;
use resizer_storage::{create_storage, BlobStore};
use std::sync::Arc;

/// Build the blob store variants are written to.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = ?storage.backend_type(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
