//! Application state shared by every request.
//!
//! Built once at startup and never mutated; handlers receive it as `Arc<AppState>`.

use pixport_core::Config;
use pixport_processing::ImageValidator;
use pixport_storage::{ImageStore, UploadSigner};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ImageStore>,
    /// Present only when remote credentials are configured
    pub signer: Option<UploadSigner>,
    pub validator: ImageValidator,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ImageStore>, signer: Option<UploadSigner>) -> Self {
        let validator = ImageValidator::new(
            config.max_file_size_bytes(),
            config.allowed_extensions().to_vec(),
            config.allowed_content_types().to_vec(),
        );

        Self {
            config,
            store,
            signer,
            validator,
        }
    }
}
