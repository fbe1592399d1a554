use crate::traits::{validate_public_id, ImageStore, StoreError, StoreResult, StoreUpload, StoredAsset};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem image store
///
/// Layout: `<base_path>/<folder>/<public_id>.<ext>`, served at
/// `<base_url>/<folder>/<public_id>.<ext>`.
#[derive(Clone, Debug)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored images (e.g., "/var/lib/pixport/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a folder to a directory under the base path
    fn folder_to_path(&self, folder: &str) -> StoreResult<PathBuf> {
        if folder.contains("..") || folder.starts_with('/') || folder.contains('\\') {
            return Err(StoreError::InvalidKey(folder.to_string()));
        }
        Ok(self.base_path.join(folder))
    }

    /// Bare ids must be a single path component
    fn validate_bare_id(public_id: &str) -> StoreResult<()> {
        validate_public_id(public_id)?;
        if public_id.contains('/') {
            return Err(StoreError::InvalidKey(public_id.to_string()));
        }
        Ok(())
    }

    /// Generate public URL for a stored file
    fn generate_url(&self, folder: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            folder.trim_matches('/'),
            file_name
        )
    }

    /// Find the stored file for `public_id`.
    ///
    /// Folder-qualified ids (`<folder>/<id>`) look only in that folder; bare ids
    /// search the whole tree.
    async fn locate(&self, public_id: &str) -> StoreResult<Option<PathBuf>> {
        if let Some((folder, stem)) = public_id.rsplit_once('/') {
            Self::validate_bare_id(stem)?;
            let dir = self.folder_to_path(folder)?;
            if !fs::try_exists(&dir).await.unwrap_or(false) {
                return Ok(None);
            }
            return find_in_dir(&dir, stem).await;
        }

        Self::validate_bare_id(public_id)?;

        let mut pending = vec![self.base_path.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && stem_matches(&path, public_id) {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }
}

fn stem_matches(path: &Path, stem: &str) -> bool {
    path.file_stem().and_then(|s| s.to_str()) == Some(stem)
}

async fn find_in_dir(dir: &Path, stem: &str) -> StoreResult<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && stem_matches(&path, stem) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[async_trait]
impl ImageStore for LocalStore {
    async fn upload(&self, upload: StoreUpload) -> StoreResult<StoredAsset> {
        Self::validate_bare_id(&upload.public_id)?;
        let dir = self.folder_to_path(&upload.folder)?;
        let file_name = format!("{}.{}", upload.public_id, upload.extension);
        let path = dir.join(&file_name);
        let size = upload.data.len();

        fs::create_dir_all(&dir).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StoreError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&upload.data).await.map_err(|e| {
            StoreError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StoreError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&upload.folder, &file_name);

        tracing::info!(
            path = %path.display(),
            public_id = %upload.public_id,
            folder = %upload.folder,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store upload successful"
        );

        Ok(StoredAsset {
            public_id: upload.public_id,
            secure_url: url,
            folder: upload.folder,
            width: None,
            height: None,
            bytes: size as u64,
            format: upload.extension,
        })
    }

    async fn destroy(&self, public_id: &str) -> StoreResult<()> {
        let start = std::time::Instant::now();

        let path = self
            .locate(public_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(public_id.to_string()))?;

        fs::remove_file(&path).await.map_err(|e| {
            StoreError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            public_id = %public_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tempfile::tempdir;

    fn upload(folder: &str, public_id: &str) -> StoreUpload {
        StoreUpload {
            folder: folder.to_string(),
            public_id: public_id.to_string(),
            data: Bytes::from_static(b"jpeg bytes"),
            content_type: "image/jpeg".to_string(),
            extension: "jpg".to_string(),
            transformation: None,
        }
    }

    #[tokio::test]
    async fn test_local_store_upload_layout_and_url() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "http://localhost:3000/media/".to_string())
            .await
            .unwrap();

        let asset = store
            .upload(upload("earnbuddy/profiles", "profile_1"))
            .await
            .unwrap();

        assert_eq!(asset.public_id, "profile_1");
        assert_eq!(
            asset.secure_url,
            "http://localhost:3000/media/earnbuddy/profiles/profile_1.jpg"
        );
        assert_eq!(asset.bytes, 10);
        assert!(dir.path().join("earnbuddy/profiles/profile_1.jpg").exists());
    }

    #[tokio::test]
    async fn test_destroy_succeeds_once_then_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap();
        store
            .upload(upload("earnbuddy/posts", "post_1_abcdefghi"))
            .await
            .unwrap();

        store.destroy("post_1_abcdefghi").await.unwrap();
        assert!(matches!(
            store.destroy("post_1_abcdefghi").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_destroy_folder_qualified_id() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap();
        store
            .upload(upload("earnbuddy/profiles", "profile_2"))
            .await
            .unwrap();

        assert!(matches!(
            store.destroy("earnbuddy/posts/profile_2").await,
            Err(StoreError::NotFound(_))
        ));
        store.destroy("earnbuddy/profiles/profile_2").await.unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap();

        assert!(matches!(
            store.upload(upload("../outside", "profile_3")).await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.upload(upload("earnbuddy", "a/b")).await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.destroy("../../etc/passwd").await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.destroy("a\\b").await,
            Err(StoreError::InvalidKey(_))
        ));
    }
}
