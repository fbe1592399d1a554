//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixport-api`. No external services are
//! needed; images are stored on a local store in a temp dir.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use pixport_api::constants;
use pixport_api::setup::routes;
use pixport_api::state::AppState;
use pixport_core::config::CloudCredentials;
use pixport_core::{Config, UploadProcessorConfig};
use pixport_storage::{LocalStore, UploadSigner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use self::storage::RecordingStore;

pub const TEST_API_TOKEN: &str = "test-upload-token-0123456789";

/// Path below the upload prefix (e.g. `/profile-photo` -> `/api/upload/profile-photo`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::UPLOAD_PREFIX, path)
}

pub fn test_credentials() -> CloudCredentials {
    CloudCredentials {
        cloud_name: "demo".to_string(),
        api_key: "123456789012345".to_string(),
        api_secret: "test-secret".to_string(),
    }
}

/// Knobs for a test app; defaults match an unauthenticated local deployment.
#[derive(Default)]
pub struct TestAppOptions {
    pub api_token: Option<String>,
    pub credentials: Option<CloudCredentials>,
    pub rollback_partial_batches: bool,
}

/// Test application: server, recording store, and owned temp dirs.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<RecordingStore>,
    pub config: Config,
    pub media_dir: PathBuf,
    pub spool_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// On-disk location of an uploaded image
    pub fn stored_file(&self, folder: &str, public_id: &str) -> PathBuf {
        self.media_dir.join(folder).join(format!("{}.jpg", public_id))
    }

    /// Files left behind in the spool directory
    pub fn spooled_files(&self) -> Vec<PathBuf> {
        list_files(&self.spool_dir)
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

/// Setup test app with local storage and an isolated spool directory.
pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let media_dir = temp_dir.path().join("media");
    let spool_dir = temp_dir.path().join("spool");

    let mut inner =
        UploadProcessorConfig::local(media_dir.to_string_lossy().to_string(), &spool_dir);
    inner.upload_api_token = options.api_token;
    inner.cloud_credentials = options.credentials;
    inner.rollback_partial_batches = options.rollback_partial_batches;
    let config = Config(Box::new(inner));
    config.validate().expect("Test config should be valid");

    let local = LocalStore::new(
        &media_dir,
        config
            .local_storage_base_url()
            .unwrap_or("http://localhost:3000/media")
            .to_string(),
    )
    .await
    .expect("Failed to create local store");
    let store = Arc::new(RecordingStore::new(Arc::new(local)));
    let signer = config.cloud_credentials().map(UploadSigner::new);

    let state = Arc::new(AppState::new(config.clone(), store.clone(), signer));
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        config,
        media_dir,
        spool_dir,
        _temp_dir: temp_dir,
    }
}
