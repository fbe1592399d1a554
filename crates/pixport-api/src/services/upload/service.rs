//! Upload service
//!
//! Runs one request through the pipeline: spool every file, validate the batch,
//! then transform and persist each file in input order. Spooled files are
//! removed on every exit path.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Multipart;
use pixport_core::models::SignatureData;
use pixport_core::{AppError, UploadKind};
use pixport_processing::{ImageTransformer, TransformSpec};
use pixport_storage::{generate_public_id, StoreError, StoreUpload, StoredAsset};

use super::spool::{Spool, SpoolLimits, SpooledFile};
use crate::constants::DIRECT_UPLOAD_FOLDER;
use crate::error::{store_error_to_app, transform_error_to_app, validation_error_to_app};
use crate::state::AppState;

/// A persisted upload together with the client's original file name
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub asset: StoredAsset,
    pub original_name: String,
}

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    fn limits(&self, kind: UploadKind) -> SpoolLimits {
        SpoolLimits {
            field: kind.form_field(),
            max_files: match kind {
                UploadKind::ProfilePhoto => 1,
                UploadKind::PostImage => self.state.config.max_images_per_request(),
            },
            max_file_size: self.state.config.max_file_size_bytes(),
        }
    }

    /// Complete upload workflow: spool → validate → transform → persist → cleanup
    pub async fn upload(
        &self,
        kind: UploadKind,
        multipart: Multipart,
    ) -> Result<Vec<UploadedAsset>, AppError> {
        let mut spool = Spool::new(self.state.config.upload_tmp_dir());

        let result = self.run(kind, &mut spool, multipart).await;

        let spooled = spool.paths().len();
        spool.cleanup().await;
        tracing::debug!(kind = kind.as_str(), spooled, "Spool cleaned up");

        result
    }

    async fn run(
        &self,
        kind: UploadKind,
        spool: &mut Spool,
        multipart: Multipart,
    ) -> Result<Vec<UploadedAsset>, AppError> {
        spool.receive(multipart, self.limits(kind)).await?;

        if spool.files().is_empty() {
            return Err(AppError::InvalidInput(
                match kind {
                    UploadKind::ProfilePhoto => "No file uploaded",
                    UploadKind::PostImage => "No files uploaded",
                }
                .to_string(),
            ));
        }

        // One invalid file fails the whole batch before any work is done
        for file in spool.files() {
            self.state
                .validator
                .validate_all(&file.original_name, &file.content_type, file.size)
                .map_err(|e| {
                    tracing::debug!(
                        original_name = %file.original_name,
                        content_type = %file.content_type,
                        error = %e,
                        "Rejected upload"
                    );
                    validation_error_to_app(e)
                })?;
        }

        let mut uploaded: Vec<UploadedAsset> = Vec::with_capacity(spool.files().len());
        for file in spool.files() {
            match self.process_file(kind, file).await {
                Ok(asset) => uploaded.push(asset),
                Err(err) => {
                    if !uploaded.is_empty() {
                        self.handle_partial_batch(&uploaded).await;
                    }
                    return Err(err);
                }
            }
        }

        Ok(uploaded)
    }

    /// Transform and persist one spooled file
    async fn process_file(
        &self,
        kind: UploadKind,
        file: &SpooledFile,
    ) -> Result<UploadedAsset, AppError> {
        let start = Instant::now();
        let data = tokio::fs::read(&file.path).await?;

        let spec = TransformSpec::for_kind(kind);
        let transformed = tokio::task::spawn_blocking(move || ImageTransformer::apply(&data, &spec))
            .await
            .map_err(|e| AppError::Internal(format!("Transform task failed: {}", e)))?
            .map_err(transform_error_to_app)?;

        let folder = kind.folder(self.state.config.folder_root());
        let public_id = generate_public_id(
            kind,
            chrono::Utc::now().timestamp_millis(),
            &mut rand::rng(),
        );

        let upload = StoreUpload {
            folder: folder.clone(),
            public_id: public_id.clone(),
            content_type: transformed.content_type().to_string(),
            extension: transformed.format.extension().to_string(),
            data: transformed.data,
            transformation: Some(spec.remote_transformation()),
        };

        let asset = self
            .state
            .store
            .upload(upload)
            .await
            .map_err(store_error_to_app)?;

        tracing::info!(
            kind = kind.as_str(),
            public_id = %asset.public_id,
            folder = %folder,
            original_name = %file.original_name,
            size_bytes = asset.bytes,
            width = transformed.width,
            height = transformed.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded"
        );

        Ok(UploadedAsset {
            asset,
            original_name: file.original_name.clone(),
        })
    }

    /// Earlier assets of a failed batch stay persisted unless rollback is enabled
    async fn handle_partial_batch(&self, uploaded: &[UploadedAsset]) {
        if !self.state.config.rollback_partial_batches() {
            tracing::warn!(
                persisted = uploaded.len(),
                "Batch failed partway; earlier images remain persisted"
            );
            return;
        }

        for item in uploaded {
            match self.state.store.destroy(&item.asset.public_id).await {
                Ok(()) => tracing::info!(
                    public_id = %item.asset.public_id,
                    "Rolled back image from failed batch"
                ),
                Err(e) => tracing::warn!(
                    public_id = %item.asset.public_id,
                    error = %e,
                    "Failed to roll back image from failed batch"
                ),
            }
        }
    }

    /// Delete a persisted image. Any failure is reported with its cause.
    pub async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        self.state.store.destroy(public_id).await.map_err(|e| {
            let cause = match &e {
                StoreError::DeleteFailed(msg)
                | StoreError::UploadFailed(msg)
                | StoreError::BackendError(msg)
                | StoreError::InvalidKey(msg)
                | StoreError::ConfigError(msg) => msg.clone(),
                other => other.to_string(),
            };
            AppError::DeleteFailed { cause }
        })?;

        tracing::info!(public_id = %public_id, "Image deleted");
        Ok(())
    }

    /// Signed parameters for a direct client upload into `<root>/uploads`
    pub fn signature(&self) -> Result<SignatureData, AppError> {
        let signer = self.state.signer.as_ref().ok_or_else(|| {
            AppError::NotConfigured("Remote credentials are not configured".to_string())
        })?;

        let root = self.state.config.folder_root().trim_matches('/');
        let folder = if root.is_empty() {
            DIRECT_UPLOAD_FOLDER.to_string()
        } else {
            format!("{}/{}", root, DIRECT_UPLOAD_FOLDER)
        };

        Ok(signer.direct_upload(&folder, chrono::Utc::now().timestamp()))
    }
}
