use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ManifestKey {
    pub width: u32,
    pub height: u32,
    pub key: String,
}

/// Result of a fully successful resize request. `keys` is sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Manifest {
    pub format: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub keys: Vec<ManifestKey>,
}
