//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use resizer_core::constants::DEFAULT_FORMAT;
use resizer_core::{Config, StorageBackend};
use resizer_processing::OutputFormat;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if let Some(fallback) = config.fallback() {
        let format: OutputFormat = fallback
            .format
            .parse()
            .map_err(|e| anyhow::anyhow!("FALLBACK_FORMAT is invalid: {}", e))?;
        if fallback.size.is_none() && format.as_str() == DEFAULT_FORMAT {
            return Err(anyhow::anyhow!(
                "FALLBACK_FORMAT={} without FALLBACK_SIZE has the same key as the original variant",
                DEFAULT_FORMAT
            ));
        }
    }

    if config.is_production() && config.storage_backend() == StorageBackend::Memory {
        tracing::warn!("Memory storage backend in production - variants are lost on restart");
    }

    if config.request_timeout_secs() < config.http_client_timeout_secs() {
        tracing::warn!(
            request_timeout_secs = config.request_timeout_secs(),
            http_client_timeout_secs = config.http_client_timeout_secs(),
            "REQUEST_TIMEOUT_SECS is shorter than the fetch timeout - slow sources will be cancelled"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
