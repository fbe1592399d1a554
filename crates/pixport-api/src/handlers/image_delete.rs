use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pixport_core::models::{ApiResponse, DeleteImageData};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;

/// Delete an uploaded image by public id
///
/// Folder-qualified ids (`earnbuddy/posts/post_...`) are accepted as-is.
#[utoipa::path(
    delete,
    path = "/api/upload/image/{public_id}",
    tag = "upload",
    params(
        ("public_id" = String, Path, description = "Public id returned by an upload")
    ),
    responses(
        (status = 200, description = "Image deleted successfully", body = ApiResponse<DeleteImageData>),
        (status = 400, description = "Failed to delete image", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(public_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteImageData>>, HttpAppError> {
    UploadService::new(&state).delete(&public_id).await?;

    Ok(Json(ApiResponse::ok(
        "Image deleted successfully",
        DeleteImageData {
            result: "ok".to_string(),
            public_id,
        },
    )))
}
