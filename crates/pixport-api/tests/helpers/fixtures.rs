//! Test fixtures: encoded images and non-image blobs.

use axum_test::multipart::Part;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, format)
        .expect("Failed to encode fixture");
    buf.into_inner()
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// Minimal valid PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
trailer
<< /Root 1 0 R >>
%%EOF"
        .to_vec()
}

pub fn create_test_text() -> Vec<u8> {
    b"not an image\n".to_vec()
}

/// Multipart file part with a name and MIME type
pub fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type)
}

pub fn jpeg_part(width: u32, height: u32, file_name: &str) -> Part {
    file_part(create_test_jpeg(width, height), file_name, "image/jpeg")
}

/// Decode stored bytes and return their dimensions
pub fn dimensions_of(data: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(data).expect("Stored file should be an image");
    (img.width(), img.height())
}
