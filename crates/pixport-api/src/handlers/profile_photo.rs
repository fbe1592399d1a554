use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use pixport_core::models::{ApiResponse, ProfilePhotoData};
use pixport_core::{AppError, UploadKind};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;

/// Upload a profile photo
///
/// Accepts exactly one file in the `photo` field. The image is cropped to a
/// 400x400 square and stored under `<root>/profiles`.
#[utoipa::path(
    post,
    path = "/api/upload/profile-photo",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile photo uploaded successfully", body = ApiResponse<ProfilePhotoData>),
        (status = 400, description = "Missing, invalid or undecodable file", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_profile_photo"))]
pub async fn upload_profile_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ProfilePhotoData>>, HttpAppError> {
    let uploaded = UploadService::new(&state)
        .upload(UploadKind::ProfilePhoto, multipart)
        .await?;

    let photo = uploaded
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("Upload produced no asset".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "Profile photo uploaded successfully",
        ProfilePhotoData {
            photo_url: photo.asset.secure_url,
            public_id: photo.asset.public_id,
        },
    )))
}
