//! Planned variants: target size, format and storage key.

use crate::constants::{FALLBACK_LABEL, ORIGINAL_LABEL};
use crate::models::{Size, SourceMetadata};

/// One unit of output work: produce `target_format` at `target_size` and
/// store the result under `storage_key`. A missing size means "use the
/// source dimensions".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantSpec {
    pub target_size: Option<Size>,
    pub target_format: String,
    pub storage_key: String,
    /// Produced from the configured fallback rather than from the request.
    pub fallback: bool,
}

impl VariantSpec {
    /// Label used in logs, counters and error entries: `"fallback"`,
    /// `"640x480"` or `"original"`.
    pub fn label(&self) -> String {
        if self.fallback {
            return FALLBACK_LABEL.to_string();
        }
        match self.target_size {
            Some(size) => size.label(),
            None => ORIGINAL_LABEL.to_string(),
        }
    }

    /// Size actually produced: the explicit size, or the source dimensions.
    pub fn effective_size(&self, source: &SourceMetadata) -> Size {
        self.target_size.unwrap_or_else(|| source.size())
    }

    /// An explicit size larger than the source in both dimensions is never produced.
    pub fn is_upscale(&self, source: &SourceMetadata) -> bool {
        self.target_size
            .map(|size| size.exceeds(source))
            .unwrap_or(false)
    }
}

/// Configured variant that is produced for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackVariant {
    pub format: String,
    pub size: Option<Size>,
}
