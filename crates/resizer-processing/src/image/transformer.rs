//! `image`-crate implementation of the transform capability.

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};
use resizer_core::SourceMetadata;

use crate::format::OutputFormat;
use crate::image::ImageResize;
use crate::traits::{ImageTransform, TransformError, TransformOptions};

/// Decodes, resizes and encodes on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        Self
    }

    fn read_metadata(data: &[u8]) -> Result<SourceMetadata, TransformError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| TransformError::Decode("unrecognized image format".to_string()))?;
        let format = OutputFormat::from_image_format(format).ok_or_else(|| {
            TransformError::UnsupportedFormat(format!("{:?}", format).to_lowercase())
        })?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        Ok(SourceMetadata {
            width,
            height,
            format: format.as_str().to_string(),
            content_type: format.content_type().to_string(),
        })
    }

    /// Synchronous transform; called from `spawn_blocking`.
    pub fn transform_blocking(
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<Bytes, TransformError> {
        let img =
            image::load_from_memory(data).map_err(|e| TransformError::Decode(e.to_string()))?;

        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = ImageResize::calculate_dimensions(
            orig_width,
            orig_height,
            options.width,
            options.height,
            options.fit_within_bounds,
        );
        let resized = ImageResize::resize_image(img, width, height);

        // JPEG has no alpha channel
        let encodable = match options.format {
            OutputFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
            _ => DynamicImage::ImageRgba8(resized.to_rgba8()),
        };

        let mut cursor = Cursor::new(Vec::new());
        encodable
            .write_to(&mut cursor, options.format.image_format())
            .map_err(|e| TransformError::Encode {
                format: options.format.to_string(),
                message: e.to_string(),
            })?;

        Ok(Bytes::from(cursor.into_inner()))
    }
}

#[async_trait]
impl ImageTransform for ImageTransformer {
    async fn metadata(&self, data: Bytes) -> Result<SourceMetadata, TransformError> {
        Self::read_metadata(&data)
    }

    async fn transform(
        &self,
        data: Bytes,
        options: TransformOptions,
    ) -> Result<Bytes, TransformError> {
        let start = std::time::Instant::now();
        let format = options.format;

        let output = tokio::task::spawn_blocking(move || Self::transform_blocking(&data, &options))
            .await
            .map_err(|e| TransformError::Task(e.to_string()))??;

        tracing::debug!(
            format = %format,
            size_bytes = output.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(output)
    }
}
