//! Transient spool for incoming multipart files.
//!
//! Each file field is streamed to `{uuid}-{millis}{ext}` under the spool
//! directory while the per-file size and per-request count limits are enforced.
//! Every path is recorded before its first byte is written, so `cleanup` also
//! removes partially written files.

use axum::extract::Multipart;
use pixport_core::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::multipart_error_to_app;

/// One file received from the client
#[derive(Debug, Clone)]
pub struct SpooledFile {
    pub field: String,
    pub original_name: String,
    pub content_type: String,
    pub size: usize,
    pub path: PathBuf,
}

/// Transport-level limits for one request
#[derive(Debug, Clone, Copy)]
pub struct SpoolLimits {
    /// Only file fields with this name are accepted
    pub field: &'static str,
    pub max_files: usize,
    pub max_file_size: usize,
}

#[derive(Debug)]
pub struct Spool {
    dir: PathBuf,
    files: Vec<SpooledFile>,
    /// Every path created for this request, including incomplete ones
    paths: Vec<PathBuf>,
}

impl Spool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            paths: Vec::new(),
        }
    }

    pub fn files(&self) -> &[SpooledFile] {
        &self.files
    }

    /// Paths currently owned by this spool
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Drain `multipart` into the spool directory.
    ///
    /// Text fields are ignored. File fields with an unexpected name, more than
    /// `max_files` files, or a file over `max_file_size` fail the request.
    pub async fn receive(
        &mut self,
        mut multipart: Multipart,
        limits: SpoolLimits,
    ) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;

        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error_to_app)? {
            // Text fields and empty file inputs carry no file
            let Some(file_name) = field
                .file_name()
                .filter(|n| !n.is_empty())
                .map(str::to_string)
            else {
                continue;
            };
            let field_name = field.name().unwrap_or_default().to_string();

            if field_name != limits.field {
                return Err(AppError::InvalidInput(format!(
                    "Unexpected field: {}",
                    field_name
                )));
            }
            if self.files.len() >= limits.max_files {
                return Err(AppError::InvalidInput(format!(
                    "Too many files (max: {})",
                    limits.max_files
                )));
            }

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            // The client's name is kept verbatim; only the spool path is sanitized
            let original_name = file_name;
            let path = self.dir.join(spool_file_name(&sanitize_filename(&original_name)));
            self.paths.push(path.clone());

            let mut file = fs::File::create(&path).await?;
            let mut size = 0usize;
            while let Some(chunk) = field.chunk().await.map_err(multipart_error_to_app)? {
                size += chunk.len();
                if size > limits.max_file_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File too large (max: {} MB)",
                        limits.max_file_size / 1024 / 1024
                    )));
                }
                file.write_all(&chunk).await?;
            }
            file.flush().await?;

            tracing::debug!(
                field = %field_name,
                original_name = %original_name,
                content_type = %content_type,
                size_bytes = size,
                path = %path.display(),
                "Spooled upload"
            );

            self.files.push(SpooledFile {
                field: field_name,
                original_name,
                content_type,
                size,
                path,
            });
        }

        Ok(())
    }

    /// Remove every spooled path. Failures are logged and never propagated.
    pub async fn cleanup(&mut self) {
        for path in self.paths.drain(..) {
            remove_quietly(&path).await;
        }
        self.files.clear();
    }
}

impl Drop for Spool {
    // Handler futures can be dropped mid-request when a client disconnects.
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove spooled file");
                }
            }
        }
    }
}

async fn remove_quietly(path: &Path) {
    match fs::try_exists(path).await {
        Ok(true) => {
            if let Err(e) = fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove spooled file");
            }
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to check spooled file");
        }
    }
}

/// `{uuid}-{millis}{ext}`; the extension keeps the client's casing
fn spool_file_name(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!(
        "{}-{}{}",
        uuid::Uuid::new_v4(),
        chrono::Utc::now().timestamp_millis(),
        ext
    )
}

/// Strip directories and unusual characters from a client-supplied file name.
/// Long names are shortened in the stem so the extension survives.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = filename_only
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        return "file".to_string();
    }

    let (stem, ext) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (cleaned.as_str(), None),
    };
    let ext_len = ext.map(|e| e.chars().count() + 1).unwrap_or(0);
    let stem: String = stem
        .chars()
        .take(MAX_FILENAME_LENGTH.saturating_sub(ext_len))
        .collect();

    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
