use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions.
    ///
    /// A missing dimension follows the source aspect ratio. With
    /// `fit_within_bounds` the result fits inside the requested box and is
    /// never larger than the source.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        width: Option<u32>,
        height: Option<u32>,
        fit_within_bounds: bool,
    ) -> (u32, u32) {
        let (target_width, target_height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width as f64;
                (w, ((w as f64 * aspect_ratio).round() as u32).max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height as f64;
                (((h as f64 * aspect_ratio).round() as u32).max(1), h)
            }
            (None, None) => return (orig_width, orig_height),
        };

        if !fit_within_bounds {
            return (target_width, target_height);
        }

        let scale = (target_width as f64 / orig_width as f64)
            .min(target_height as f64 / orig_height as f64)
            .min(1.0);

        (
            ((orig_width as f64 * scale).round() as u32).max(1),
            ((orig_height as f64 * scale).round() as u32).max(1),
        )
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Resize to exact dimensions; returns the image untouched when the size already matches.
    pub fn resize_image(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img;
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}
