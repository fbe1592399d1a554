//! Store wrapper that counts calls reaching the backend.

use async_trait::async_trait;
use pixport_storage::{ImageStore, StorageBackend, StoreResult, StoreUpload, StoredAsset};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct RecordingStore {
    inner: Arc<dyn ImageStore>,
    uploads: AtomicUsize,
    destroys: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn ImageStore>) -> Self {
        Self {
            inner,
            uploads: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
        }
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStore for RecordingStore {
    async fn upload(&self, upload: StoreUpload) -> StoreResult<StoredAsset> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload(upload).await
    }

    async fn destroy(&self, public_id: &str) -> StoreResult<()> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        self.inner.destroy(public_id).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
