//! Cloudinary-compatible HTTP image store.
//!
//! Uploads are signed multipart POSTs to `{api_base}/{cloud}/image/upload`;
//! deletes are signed form POSTs to `{api_base}/{cloud}/image/destroy`.

use crate::signing::{UploadSigner, SIGNATURE_ALGORITHM};
use crate::traits::{validate_public_id, ImageStore, StoreError, StoreResult, StoreUpload, StoredAsset};
use crate::StorageBackend;
use async_trait::async_trait;
use pixport_core::config::CloudCredentials;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    bytes: Option<u64>,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    error: RemoteErrorBody,
}

#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    signer: UploadSigner,
}

impl CloudinaryStore {
    pub fn new(
        credentials: &CloudCredentials,
        api_base: impl Into<String>,
        connect_timeout: Duration,
    ) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| StoreError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            cloud_name: credentials.cloud_name.clone(),
            api_key: credentials.api_key.clone(),
            signer: UploadSigner::new(credentials),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.api_base, self.cloud_name, action)
    }

    /// Sign `params` and add the unsigned authentication fields
    fn signed_params(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = self.signer.sign(&params);
        params.insert("signature", signature);
        params.insert("signature_algorithm", SIGNATURE_ALGORITHM.to_string());
        params.insert("api_key", self.api_key.clone());
        params
    }
}

/// Message from a `{"error":{"message":...}}` body, falling back to the status line
fn remote_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<RemoteError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("remote host responded with status {}", status))
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, upload: StoreUpload) -> StoreResult<StoredAsset> {
        let start = std::time::Instant::now();
        let size = upload.data.len();

        let mut params = BTreeMap::new();
        params.insert("folder", upload.folder.clone());
        params.insert("public_id", upload.public_id.clone());
        if let Some(transformation) = &upload.transformation {
            params.insert("transformation", transformation.clone());
        }
        let params = self.signed_params(params);

        let file_part = reqwest::multipart::Part::bytes(upload.data.to_vec())
            .file_name(format!("{}.{}", upload.public_id, upload.extension))
            .mime_str(&upload.content_type)
            .map_err(|e| StoreError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form.part("file", file_part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::BackendError(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::BackendError(format!("Failed to read upload response: {}", e)))?;

        if !status.is_success() {
            return Err(StoreError::UploadFailed(remote_error_message(status, &body)));
        }

        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            StoreError::BackendError(format!("Failed to parse upload response: {}", e))
        })?;

        tracing::info!(
            public_id = %parsed.public_id,
            folder = %upload.folder,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote upload successful"
        );

        Ok(StoredAsset {
            public_id: parsed.public_id,
            secure_url: parsed.secure_url,
            folder: upload.folder,
            width: parsed.width,
            height: parsed.height,
            bytes: parsed.bytes.unwrap_or(size as u64),
            format: parsed.format.unwrap_or(upload.extension),
        })
    }

    async fn destroy(&self, public_id: &str) -> StoreResult<()> {
        validate_public_id(public_id)?;
        let start = std::time::Instant::now();

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let params = self.signed_params(params);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| StoreError::BackendError(format!("Destroy request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::BackendError(format!("Failed to read destroy response: {}", e)))?;

        if !status.is_success() {
            return Err(StoreError::DeleteFailed(remote_error_message(status, &body)));
        }

        let parsed: DestroyResponse = serde_json::from_str(&body).map_err(|e| {
            StoreError::BackendError(format!("Failed to parse destroy response: {}", e))
        })?;

        match parsed.result.as_str() {
            "ok" => {
                tracing::info!(
                    public_id = %public_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Remote delete successful"
                );
                Ok(())
            }
            "not found" => Err(StoreError::NotFound(public_id.to_string())),
            other => Err(StoreError::DeleteFailed(other.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}
