//! Configuration module
//!
//! Configuration is read once from the environment at startup, validated, and then
//! passed explicitly to every component. Nothing reads the environment afterwards.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 5;
const MAX_IMAGES_PER_REQUEST: usize = 5;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FOLDER_ROOT: &str = "earnbuddy";
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str =
    "image/jpeg,image/jpg,image/png,image/gif,image/webp";

/// Credentials for the remote image host
#[derive(Clone)]
pub struct CloudCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Upload processor configuration
#[derive(Clone, Debug)]
pub struct UploadProcessorConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    // Remote store
    pub storage_backend: StorageBackend,
    pub cloud_credentials: Option<CloudCredentials>,
    pub cloudinary_api_base: String,
    pub http_connect_timeout_secs: u64,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub folder_root: String,
    // Transient spool
    pub upload_tmp_dir: PathBuf,
    // Validation gate
    pub max_file_size_bytes: usize,
    pub max_images_per_request: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    // Access
    pub upload_api_token: Option<String>,
    pub rollback_partial_batches: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadProcessorConfig>);

impl Config {
    fn inner(&self) -> &UploadProcessorConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploadProcessorConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn cloud_credentials(&self) -> Option<&CloudCredentials> {
        self.inner().cloud_credentials.as_ref()
    }

    pub fn cloudinary_api_base(&self) -> &str {
        &self.inner().cloudinary_api_base
    }

    pub fn http_connect_timeout_secs(&self) -> u64 {
        self.inner().http_connect_timeout_secs
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn folder_root(&self) -> &str {
        &self.inner().folder_root
    }

    pub fn upload_tmp_dir(&self) -> &std::path::Path {
        &self.inner().upload_tmp_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_images_per_request(&self) -> usize {
        self.inner().max_images_per_request
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn upload_api_token(&self) -> Option<&str> {
        self.inner().upload_api_token.as_deref()
    }

    pub fn rollback_partial_batches(&self) -> bool {
        self.inner().rollback_partial_batches
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl UploadProcessorConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = match non_empty_var("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let cors_origins = parse_cors_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let storage_backend = match non_empty_var("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Cloudinary,
        };

        let cloud_credentials = match (
            non_empty_var("CLOUDINARY_CLOUD_NAME"),
            non_empty_var("CLOUDINARY_API_KEY"),
            non_empty_var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let max_file_size_mb = non_empty_var("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let upload_tmp_dir = non_empty_var("UPLOAD_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("pixport-uploads"));

        let config = UploadProcessorConfig {
            server_port,
            environment,
            cors_origins,
            http_concurrency_limit: non_empty_var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            storage_backend,
            cloud_credentials,
            cloudinary_api_base: non_empty_var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string()),
            http_connect_timeout_secs: non_empty_var("HTTP_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(HTTP_CONNECT_TIMEOUT_SECS),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            folder_root: non_empty_var("UPLOAD_FOLDER_ROOT")
                .unwrap_or_else(|| DEFAULT_FOLDER_ROOT.to_string()),
            upload_tmp_dir,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_images_per_request: non_empty_var("MAX_IMAGES_PER_REQUEST")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(MAX_IMAGES_PER_REQUEST),
            allowed_extensions: parse_list(
                &non_empty_var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            allowed_content_types: parse_list(
                &non_empty_var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
            ),
            upload_api_token: non_empty_var("UPLOAD_API_TOKEN"),
            rollback_partial_batches: non_empty_var("ROLLBACK_PARTIAL_BATCHES")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults for everything, local backend rooted at `local_storage_path`.
    /// Used by tests and local development tooling.
    pub fn local(local_storage_path: impl Into<String>, upload_tmp_dir: impl Into<PathBuf>) -> Self {
        UploadProcessorConfig {
            server_port: SERVER_PORT,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            storage_backend: StorageBackend::Local,
            cloud_credentials: None,
            cloudinary_api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
            http_connect_timeout_secs: HTTP_CONNECT_TIMEOUT_SECS,
            local_storage_path: Some(local_storage_path.into()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            folder_root: DEFAULT_FOLDER_ROOT.to_string(),
            upload_tmp_dir: upload_tmp_dir.into(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_images_per_request: MAX_IMAGES_PER_REQUEST,
            allowed_extensions: parse_list(DEFAULT_ALLOWED_EXTENSIONS),
            allowed_content_types: parse_list(DEFAULT_ALLOWED_CONTENT_TYPES),
            upload_api_token: None,
            rollback_partial_batches: false,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let is_production = {
            let env = self.environment.to_lowercase();
            env == "production" || env == "prod"
        };
        if is_production && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage_backend {
            StorageBackend::Cloudinary => {
                if self.cloud_credentials.is_none() {
                    return Err(anyhow::anyhow!(
                        "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set for the cloudinary backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    ));
                }
            }
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_images_per_request == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGES_PER_REQUEST must be greater than 0"));
        }
        if self.allowed_extensions.is_empty() || self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES cannot be empty"
            ));
        }
        if self.folder_root.contains("..") {
            return Err(anyhow::anyhow!("UPLOAD_FOLDER_ROOT cannot contain '..'"));
        }

        Ok(())
    }
}

fn parse_cors_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_defaults_match_upload_limits() {
        let config = UploadProcessorConfig::local("/tmp/media", "/tmp/spool");
        assert_eq!(config.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.max_images_per_request, 5);
        assert_eq!(
            config.allowed_extensions,
            vec!["jpg", "jpeg", "png", "gif", "webp"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cloudinary_backend_requires_credentials() {
        let mut config = UploadProcessorConfig::local("/tmp/media", "/tmp/spool");
        config.storage_backend = StorageBackend::Cloudinary;
        assert!(config.validate().is_err());

        config.cloud_credentials = Some(CloudCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let mut config = UploadProcessorConfig::local("/tmp/media", "/tmp/spool");
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = CloudCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "very-secret".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn parse_list_trims_and_lowercases() {
        assert_eq!(parse_list(" JPG, png ,,gif"), vec!["jpg", "png", "gif"]);
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("no"));
    }
}
