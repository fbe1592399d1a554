//! Image store setup

use anyhow::Result;
use pixport_core::Config;
use pixport_storage::{create_signer, create_store, ImageStore, UploadSigner};
use std::sync::Arc;

pub async fn setup_store(config: &Config) -> Result<Arc<dyn ImageStore>> {
    tracing::info!("Initializing image store...");
    let store = create_store(config).await?;
    tracing::info!(
        backend = %store.backend_type(),
        folder_root = %config.folder_root(),
        "Image store initialized successfully"
    );
    Ok(store)
}

/// Direct-upload signer; absent without remote credentials
pub fn setup_signer(config: &Config) -> Option<UploadSigner> {
    let signer = create_signer(config);
    if signer.is_none() {
        tracing::warn!("Remote credentials not configured - /signature will return 503");
    }
    signer
}
