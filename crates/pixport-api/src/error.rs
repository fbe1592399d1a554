//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors so they become
//! `HttpAppError` and render the failure envelope consistently (status, body, logging).

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixport_core::{AppError, ErrorMetadata, LogLevel};
use pixport_processing::{TransformError, ValidationError};
use pixport_storage::StoreError;
use serde::Serialize;
use utoipa::ToSchema;

/// Message used for every allow-list rejection
pub const ONLY_IMAGES_MESSAGE: &str = "Only image files are allowed!";

/// Failure envelope: `{success:false, message, error?, code}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Underlying cause, only present for delete failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            code: code.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pixport-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            success: false,
            message: app_error.client_message(),
            error: app_error.exposed_cause(),
            code: app_error.error_code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

// Convert domain errors to AppError (avoids orphan rule: conversions live next to HttpAppError)

/// Map a store failure on the upload path
pub fn store_error_to_app(err: StoreError) -> AppError {
    match err {
        StoreError::UploadFailed(msg) => AppError::Storage(msg),
        StoreError::BackendError(msg) => AppError::Storage(msg),
        StoreError::DeleteFailed(msg) => AppError::DeleteFailed { cause: msg },
        StoreError::NotFound(_) => AppError::DeleteFailed {
            cause: "not found".to_string(),
        },
        StoreError::InvalidKey(msg) => AppError::InvalidInput(format!("Invalid public id: {}", msg)),
        StoreError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        StoreError::ConfigError(msg) => AppError::NotConfigured(msg),
    }
}

pub fn validation_error_to_app(err: ValidationError) -> AppError {
    match err {
        ValidationError::FileTooLarge { size, max } => {
            AppError::PayloadTooLarge(format!("File too large: {} bytes exceeds max {} bytes", size, max))
        }
        ValidationError::EmptyFile => AppError::InvalidInput("Uploaded file is empty".to_string()),
        ValidationError::InvalidExtension { .. }
        | ValidationError::InvalidContentType { .. }
        | ValidationError::MissingExtension(_) => {
            AppError::InvalidInput(ONLY_IMAGES_MESSAGE.to_string())
        }
    }
}

pub fn transform_error_to_app(err: TransformError) -> AppError {
    AppError::ImageProcessing(err.to_string())
}

pub fn multipart_error_to_app(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body too large".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

impl From<StoreError> for HttpAppError {
    fn from(err: StoreError) -> Self {
        HttpAppError(store_error_to_app(err))
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(validation_error_to_app(err))
    }
}

impl From<TransformError> for HttpAppError {
    fn from(err: TransformError) -> Self {
        HttpAppError(transform_error_to_app(err))
    }
}
