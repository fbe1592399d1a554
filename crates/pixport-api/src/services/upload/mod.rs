//! Upload pipeline
//!
//! receive (spool) → validate → transform → persist → cleanup → respond

pub mod service;
pub mod spool;

pub use service::{UploadService, UploadedAsset};
pub use spool::{Spool, SpoolLimits, SpooledFile};
