//! Inbound resize request body.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::{Size, SizeParseError};

fn default_save_original() -> bool {
    true
}

/// Body of `POST /resize` and `POST /base64`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResizeRequest {
    /// Source image URL.
    pub url: String,
    #[serde(default)]
    pub sizes: Vec<SizeInput>,
    /// Base name of every stored variant.
    pub key: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_save_original")]
    pub save_original: bool,
}

/// A requested size, either `{"width": 640, "height": 480}` or `"640x480"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SizeInput {
    Dimensions { width: u32, height: u32 },
    Text(String),
}

impl SizeInput {
    pub fn resolve(&self) -> Result<Size, SizeParseError> {
        match self {
            SizeInput::Dimensions { width, height } => Size::new(*width, *height),
            SizeInput::Text(s) => Size::parse(s),
        }
    }
}
