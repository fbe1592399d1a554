//! Request signing for the remote image host.
//!
//! Canonical string: parameters sorted by key, rendered `key=value` and joined
//! with `&`. `file`, `api_key`, `cloud_name`, `resource_type` and empty values
//! are excluded. The API secret is appended and the result hashed with SHA-256.

use pixport_core::config::CloudCredentials;
use pixport_core::models::SignatureData;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const SIGNATURE_ALGORITHM: &str = "sha256";

const UNSIGNED_PARAMS: [&str; 4] = ["file", "api_key", "cloud_name", "resource_type"];

#[derive(Clone)]
pub struct UploadSigner {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for UploadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSigner")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl UploadSigner {
    pub fn new(credentials: &CloudCredentials) -> Self {
        Self {
            cloud_name: credentials.cloud_name.clone(),
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// Canonical string that gets hashed, without the secret
    pub fn canonical_string(params: &BTreeMap<&str, String>) -> String {
        params
            .iter()
            .filter(|(key, value)| !value.is_empty() && !UNSIGNED_PARAMS.contains(*key))
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Hex-encoded SHA-256 signature of `params`
    pub fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Self::canonical_string(params).as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Parameters a client needs to upload directly into `folder`
    pub fn direct_upload(&self, folder: &str, timestamp: i64) -> SignatureData {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("timestamp", timestamp.to_string());

        SignatureData {
            timestamp,
            signature: self.sign(&params),
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
            folder: folder.to_string(),
            signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
        }
    }
}
