//! Resizer Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by every Resizer component: the variant planner and executor,
//! the storage and processing backends, and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ResizerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    FallbackVariant, Manifest, ManifestKey, ResizeRequest, Size, SizeInput, SizeParseError,
    SourceMetadata, VariantSpec,
};
pub use storage_types::StorageBackend;
