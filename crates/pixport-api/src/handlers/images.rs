use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use pixport_core::models::{ApiResponse, ImagesData, UploadedImage};
use pixport_core::UploadKind;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;

/// Upload post images
///
/// Accepts up to `MAX_IMAGES_PER_REQUEST` files in the `images` field. Each image
/// is limited to 800x600 and stored under `<root>/posts`. Results keep the input
/// order.
#[utoipa::path(
    post,
    path = "/api/upload/images",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images uploaded successfully", body = ApiResponse<ImagesData>),
        (status = 400, description = "Missing, invalid or too many files", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Remote store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_images"))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ImagesData>>, HttpAppError> {
    let uploaded = UploadService::new(&state)
        .upload(UploadKind::PostImage, multipart)
        .await?;

    let images = uploaded
        .into_iter()
        .map(|item| UploadedImage {
            url: item.asset.secure_url,
            public_id: item.asset.public_id,
            original_name: item.original_name,
        })
        .collect();

    Ok(Json(ApiResponse::ok(
        "Images uploaded successfully",
        ImagesData { images },
    )))
}
