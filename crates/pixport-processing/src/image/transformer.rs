//! Image transformer
//!
//! Decodes an upload, fits it to the geometry of its upload kind and re-encodes
//! it. Pure and deterministic: the same bytes and `TransformSpec` always give the same output.

use crate::compression::{ImageCompressor, OutputFormat};
use crate::image::resize::{FitMode, ImageResize};
use bytes::Bytes;
use image::GenericImageView;
use pixport_core::UploadKind;
use std::io::Cursor;

const PROFILE_PHOTO_SIZE: u32 = 400;
const POST_IMAGE_MAX_WIDTH: u32 = 800;
const POST_IMAGE_MAX_HEIGHT: u32 = 600;
const DEFAULT_QUALITY: u8 = 80;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Fixed geometry and quality policy for one upload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSpec {
    pub width: u32,
    pub height: u32,
    pub fit: FitMode,
    pub format: OutputFormat,
    pub quality: u8,
}

impl TransformSpec {
    pub fn for_kind(kind: UploadKind) -> Self {
        match kind {
            UploadKind::ProfilePhoto => TransformSpec {
                width: PROFILE_PHOTO_SIZE,
                height: PROFILE_PHOTO_SIZE,
                fit: FitMode::Cover,
                format: OutputFormat::Jpeg,
                quality: DEFAULT_QUALITY,
            },
            UploadKind::PostImage => TransformSpec {
                width: POST_IMAGE_MAX_WIDTH,
                height: POST_IMAGE_MAX_HEIGHT,
                fit: FitMode::Inside,
                format: OutputFormat::Jpeg,
                quality: DEFAULT_QUALITY,
            },
        }
    }

    /// Same geometry expressed as a remote-host transformation string,
    /// e.g. `w_400,h_400,c_fill/q_auto`
    pub fn remote_transformation(&self) -> String {
        let crop = match self.fit {
            FitMode::Cover => "fill",
            FitMode::Inside => "limit",
        };
        format!("w_{},h_{},c_{}/q_auto", self.width, self.height, crop)
    }
}

/// Output of a transform
#[derive(Debug, Clone)]
pub struct TransformedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl TransformedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Main image transformer
pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode `data`, apply the fit in `spec`, and re-encode.
    ///
    /// CPU bound; callers on an async runtime should run it on the blocking pool.
    pub fn apply(data: &[u8], spec: &TransformSpec) -> Result<TransformedImage, TransformError> {
        let cursor = Cursor::new(data);
        let img = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let (orig_width, orig_height) = img.dimensions();
        let fitted = ImageResize::apply_fit(&img, spec.width, spec.height, spec.fit);
        let (width, height) = fitted.dimensions();

        tracing::debug!(
            orig_width,
            orig_height,
            width,
            height,
            fit = ?spec.fit,
            format = ?spec.format,
            quality = spec.quality,
            "Applying image transform"
        );

        let data = ImageCompressor::compress(&fitted, spec.format, spec.quality)
            .map_err(|e| TransformError::Encode(e.to_string()))?;

        Ok(TransformedImage {
            data,
            width,
            height,
            format: spec.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([30, 60, 90, 255]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_profile_photo_is_exactly_400_square_jpeg() {
        let spec = TransformSpec::for_kind(UploadKind::ProfilePhoto);
        let out = ImageTransformer::apply(&png_bytes(1000, 250), &spec).unwrap();
        assert_eq!((out.width, out.height), (400, 400));
        assert_eq!(out.content_type(), "image/jpeg");

        let decoded = image::load_from_memory(&out.data).unwrap();
        assert_eq!(decoded.dimensions(), (400, 400));
        assert_eq!(
            image::guess_format(&out.data).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_post_image_within_bounds_keeps_dimensions() {
        let spec = TransformSpec::for_kind(UploadKind::PostImage);
        let out = ImageTransformer::apply(&png_bytes(320, 240), &spec).unwrap();
        assert_eq!((out.width, out.height), (320, 240));
    }

    #[test]
    fn test_post_image_is_limited_to_bounds() {
        let spec = TransformSpec::for_kind(UploadKind::PostImage);
        let out = ImageTransformer::apply(&png_bytes(1600, 900), &spec).unwrap();
        assert!(out.width <= 800 && out.height <= 600);
        assert_eq!(out.width, 800);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let spec = TransformSpec::for_kind(UploadKind::ProfilePhoto);
        let input = png_bytes(640, 480);
        let a = ImageTransformer::apply(&input, &spec).unwrap();
        let b = ImageTransformer::apply(&input, &spec).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_non_image_bytes_fail_to_decode() {
        let spec = TransformSpec::for_kind(UploadKind::PostImage);
        let err = ImageTransformer::apply(b"%PDF-1.4 not an image", &spec).unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }

    #[test]
    fn test_remote_transformation_strings() {
        assert_eq!(
            TransformSpec::for_kind(UploadKind::ProfilePhoto).remote_transformation(),
            "w_400,h_400,c_fill/q_auto"
        );
        assert_eq!(
            TransformSpec::for_kind(UploadKind::PostImage).remote_transformation(),
            "w_800,h_600,c_limit/q_auto"
        );
    }
}
