//! Configuration module
//!
//! Environment-driven configuration of the resize service: HTTP server,
//! blob store target, optional fallback variant and timeouts. Retry
//! behaviour is fixed (see [`crate::constants`]) and not configurable.

use std::env;

use crate::constants::{
    DEFAULT_PORT, HTTP_CLIENT_TIMEOUT_SECS, MAX_BODY_BYTES, REQUEST_TIMEOUT_SECS,
};
use crate::models::{FallbackVariant, Size};
use crate::storage_types::StorageBackend;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// `json` switches the log output to JSON lines.
    pub log_format: String,
    pub max_body_bytes: usize,
}

/// Resize service configuration
#[derive(Clone, Debug)]
pub struct ResizerConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    // Fallback variant produced for every request when a format is set
    pub fallback_format: Option<String>,
    pub fallback_size: Option<Size>,
    // Timeouts
    pub http_client_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: DEFAULT_PORT,
                environment: "development".to_string(),
                log_format: "text".to_string(),
                max_body_bytes: MAX_BODY_BYTES,
            },
            storage_backend: StorageBackend::Memory,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            fallback_format: None,
            fallback_size: None,
            http_client_timeout_secs: HTTP_CLIENT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ResizerConfig>);

impl Config {
    fn as_resizer(&self) -> &ResizerConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_resizer().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ResizerConfig::from_vars(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_resizer().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_resizer().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_resizer().base.environment
    }

    pub fn log_json(&self) -> bool {
        self.as_resizer().base.log_format.eq_ignore_ascii_case("json")
    }

    pub fn max_body_bytes(&self) -> usize {
        self.as_resizer().base.max_body_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_resizer().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_resizer().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_resizer().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_resizer().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_resizer().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_resizer().local_storage_path.as_deref()
    }

    pub fn http_client_timeout_secs(&self) -> u64 {
        self.as_resizer().http_client_timeout_secs
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.as_resizer().request_timeout_secs
    }

    /// The fallback variant, present only when a fallback format is configured.
    pub fn fallback(&self) -> Option<FallbackVariant> {
        let config = self.as_resizer();
        config
            .fallback_format
            .as_ref()
            .map(|format| FallbackVariant {
                format: format.clone(),
                size: config.fallback_size,
            })
    }
}

impl From<ResizerConfig> for Config {
    fn from(config: ResizerConfig) -> Self {
        Config(Box::new(config))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ResizerConfig {
    /// Build the configuration from a variable lookup (the process environment
    /// in production).
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(backend) => backend.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let fallback_size = get("FALLBACK_SIZE")
            .map(|s| Size::parse(&s))
            .transpose()
            .map_err(|e| anyhow::anyhow!("FALLBACK_SIZE is invalid: {}", e))?;

        let base = BaseConfig {
            server_port,
            environment,
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            max_body_bytes: get("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_BODY_BYTES),
        };

        Ok(ResizerConfig {
            base,
            storage_backend,
            s3_bucket: get("S3_BUCKET"),
            s3_region: get("S3_REGION"),
            s3_endpoint: get("S3_ENDPOINT"),
            aws_region: get("AWS_REGION"),
            local_storage_path: get("LOCAL_STORAGE_PATH"),
            fallback_format: get("FALLBACK_FORMAT").map(|f| f.to_lowercase()),
            fallback_size,
            http_client_timeout_secs: get("HTTP_CLIENT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CLIENT_TIMEOUT_SECS),
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.http_client_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_CLIENT_TIMEOUT_SECS cannot be 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS cannot be 0"));
        }
        if self.base.max_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_BYTES cannot be 0"));
        }
        if self.fallback_size.is_some() && self.fallback_format.is_none() {
            return Err(anyhow::anyhow!(
                "FALLBACK_SIZE is set but FALLBACK_FORMAT is missing"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }
}
