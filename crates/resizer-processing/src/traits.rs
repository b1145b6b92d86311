//! Core traits for image transformation

use async_trait::async_trait;
use bytes::Bytes;
use resizer_core::SourceMetadata;
use thiserror::Error;

use crate::format::OutputFormat;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image as {format}: {message}")]
    Encode { format: String, message: String },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("transform task failed: {0}")]
    Task(String),
}

/// Options of one transform call.
///
/// With `fit_within_bounds` the image is scaled to fit inside
/// `width` x `height` keeping its aspect ratio, and never upscaled.
/// Without it the image is resized to exactly the requested dimensions.
/// A missing dimension is derived from the other one; no dimension at all
/// keeps the source size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: OutputFormat,
    pub fit_within_bounds: bool,
}

impl TransformOptions {
    /// Fit-within-bounds transform to the given size.
    pub fn fit(width: u32, height: u32, format: OutputFormat) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            format,
            fit_within_bounds: true,
        }
    }
}

/// Image transform capability
#[async_trait]
pub trait ImageTransform: Send + Sync {
    /// Metadata-only mode: decode headers and report dimensions and format.
    async fn metadata(&self, data: Bytes) -> Result<SourceMetadata, TransformError>;

    /// Resize and re-encode `data`.
    async fn transform(
        &self,
        data: Bytes,
        options: TransformOptions,
    ) -> Result<Bytes, TransformError>;
}
