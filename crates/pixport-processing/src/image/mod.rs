//! Image processing module
//!
//! - Geometry (resize): cover and inside fits
//! - Transform pipeline (transformer): decode, fit, re-encode

pub mod resize;
pub mod transformer;

pub use resize::{FitMode, ImageResize};
pub use transformer::{ImageTransformer, TransformError, TransformSpec, TransformedImage};
