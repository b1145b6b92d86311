//! Domain models of a resize request.

pub mod manifest;
pub mod metadata;
pub mod request;
pub mod size;
pub mod variant;

pub use manifest::{Manifest, ManifestKey};
pub use metadata::SourceMetadata;
pub use request::{ResizeRequest, SizeInput};
pub use size::{Size, SizeParseError};
pub use variant::{FallbackVariant, VariantSpec};
