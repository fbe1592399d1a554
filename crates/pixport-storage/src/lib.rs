//! Pixport Storage Library
//!
//! This crate provides the `ImageStore` abstraction for persisting processed
//! images, with a Cloudinary-compatible HTTP backend and a local filesystem
//! backend for development and tests.
//!
//! # Public ids
//!
//! Assets are addressed by a public id (`profile_<millis>` or
//! `post_<millis>_<suffix>`) inside a folder (`<root>/profiles`, `<root>/posts`).
//! Id generation is centralized in the `keys` module so all callers stay consistent.
//! Ids must not contain `..` or a backslash.

pub mod cloudinary;
pub mod factory;
pub mod keys;
pub mod local;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use cloudinary::CloudinaryStore;
pub use factory::{create_signer, create_store};
pub use keys::generate_public_id;
pub use local::LocalStore;
pub use pixport_core::StorageBackend;
pub use signing::UploadSigner;
pub use traits::{ImageStore, StoreError, StoreResult, StoreUpload, StoredAsset};
