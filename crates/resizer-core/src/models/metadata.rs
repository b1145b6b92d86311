use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Size;

/// Description of the fetched original, produced once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    /// Lower-case format name, e.g. `"jpeg"`.
    pub format: String,
    pub content_type: String,
}

impl SourceMetadata {
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}
