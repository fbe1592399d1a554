use crate::{CloudinaryStore, ImageStore, LocalStore, StorageBackend, StoreError, StoreResult, UploadSigner};
use pixport_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Create an image store based on configuration
pub async fn create_store(config: &Config) -> StoreResult<Arc<dyn ImageStore>> {
    match config.storage_backend() {
        StorageBackend::Cloudinary => {
            let credentials = config.cloud_credentials().ok_or_else(|| {
                StoreError::ConfigError(
                    "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET not configured"
                        .to_string(),
                )
            })?;

            let store = CloudinaryStore::new(
                credentials,
                config.cloudinary_api_base(),
                Duration::from_secs(config.http_connect_timeout_secs()),
            )?;
            Ok(Arc::new(store))
        }

        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StoreError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StoreError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let store = LocalStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Signer for direct uploads, available whenever remote credentials are configured
pub fn create_signer(config: &Config) -> Option<UploadSigner> {
    config.cloud_credentials().map(UploadSigner::new)
}
