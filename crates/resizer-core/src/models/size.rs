//! Target dimensions of a variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::SourceMetadata;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("invalid size '{0}': expected WIDTHxHEIGHT")]
    Malformed(String),

    #[error("invalid {dimension} in size '{input}'")]
    InvalidDimension {
        input: String,
        dimension: &'static str,
    },

    #[error("invalid size '{0}': width and height must be greater than zero")]
    Zero(String),
}

/// Width and height in pixels, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Result<Self, SizeParseError> {
        if width == 0 || height == 0 {
            return Err(SizeParseError::Zero(format!("{}x{}", width, height)));
        }
        Ok(Self { width, height })
    }

    /// Parse a `WIDTHxHEIGHT` string such as `"1200x1200"`.
    pub fn parse(s: &str) -> Result<Self, SizeParseError> {
        let trimmed = s.trim();
        let (width, height) = trimmed
            .split_once('x')
            .ok_or_else(|| SizeParseError::Malformed(s.to_string()))?;

        if width.is_empty() || height.is_empty() || height.contains('x') {
            return Err(SizeParseError::Malformed(s.to_string()));
        }

        let width = width
            .parse::<u32>()
            .map_err(|_| SizeParseError::InvalidDimension {
                input: s.to_string(),
                dimension: "width",
            })?;
        let height = height
            .parse::<u32>()
            .map_err(|_| SizeParseError::InvalidDimension {
                input: s.to_string(),
                dimension: "height",
            })?;

        Self::new(width, height).map_err(|_| SizeParseError::Zero(s.to_string()))
    }

    /// Human-readable task label, e.g. `"640x480"`.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// True when both dimensions strictly exceed the source; such variants
    /// would be upscales and are skipped.
    pub fn exceeds(&self, source: &SourceMetadata) -> bool {
        self.width > source.width && self.height > source.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::parse(s)
    }
}
