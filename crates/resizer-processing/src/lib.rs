//! Resizer Processing Library
//!
//! Image transform capability: metadata extraction from source bytes and
//! fit-within-bounds resize with format conversion, built on the `image` crate.

pub mod format;
pub mod image;
pub mod traits;

pub use format::OutputFormat;
pub use self::image::{ImageResize, ImageTransformer};
pub use traits::{ImageTransform, TransformError, TransformOptions};
