//! Pixport Image Processing Library
//!
//! This crate provides the validation gate and the in-memory transform step
//! applied to every upload before it is persisted.

pub mod compression;
pub mod image;
pub mod validator;

// Re-export commonly used types
pub use self::image::{
    FitMode, ImageResize, ImageTransformer, TransformError, TransformSpec, TransformedImage,
};
pub use compression::{ImageCompressor, OutputFormat};
pub use validator::{ImageValidator, ValidationError};
