use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resizer_core::SourceMetadata;

/// Encode a solid PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 144, 255, 255]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png fixture");
    Bytes::from(cursor.into_inner())
}

pub fn source_metadata(width: u32, height: u32) -> SourceMetadata {
    SourceMetadata {
        width,
        height,
        format: "png".to_string(),
        content_type: "image/png".to_string(),
    }
}
