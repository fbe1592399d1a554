//! Pixport Core Library
//!
//! This crate provides the configuration, error types, and response models
//! that are shared across all Pixport components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, UploadProcessorConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::UploadKind;
pub use storage_types::StorageBackend;
