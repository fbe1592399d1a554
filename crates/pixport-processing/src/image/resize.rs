use image::{DynamicImage, GenericImageView};

/// How an image is fitted into target bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Scale to cover the bounds, then crop centered. Output is exactly the bounds.
    Cover,
    /// Scale down to fit inside the bounds, preserving aspect ratio. Never enlarges.
    Inside,
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Dimensions an `Inside` fit produces for an image of the given size
    pub fn inside_dimensions(
        orig_width: u32,
        orig_height: u32,
        max_width: u32,
        max_height: u32,
    ) -> (u32, u32) {
        if orig_width <= max_width && orig_height <= max_height {
            return (orig_width, orig_height);
        }

        let scale = (max_width as f64 / orig_width as f64).min(max_height as f64 / orig_height as f64);
        let width = ((orig_width as f64 * scale).round() as u32).clamp(1, max_width);
        let height = ((orig_height as f64 * scale).round() as u32).clamp(1, max_height);
        (width, height)
    }

    /// Apply `fit` with the given bounds
    pub fn apply_fit(img: &DynamicImage, width: u32, height: u32, fit: FitMode) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();

        match fit {
            FitMode::Cover => {
                if (orig_width, orig_height) == (width, height) {
                    return img.clone();
                }
                let filter = Self::select_filter(orig_width, orig_height, width, height);
                img.resize_to_fill(width, height, filter)
            }
            FitMode::Inside => {
                let (new_width, new_height) =
                    Self::inside_dimensions(orig_width, orig_height, width, height);
                if (new_width, new_height) == (orig_width, orig_height) {
                    return img.clone();
                }
                let filter = Self::select_filter(orig_width, orig_height, new_width, new_height);
                img.resize_exact(new_width, new_height, filter)
            }
        }
    }
}
