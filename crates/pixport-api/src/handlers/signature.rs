use std::sync::Arc;

use axum::{extract::State, Json};
use pixport_core::models::{ApiResponse, SignatureData};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;

/// Issue signed parameters for a direct client-to-host upload
///
/// The signature is a SHA-256 digest, not the host's SHA-1 default. Clients must
/// forward `signatureAlgorithm` as `signature_algorithm=sha256` with the upload
/// or the host rejects the signature.
#[utoipa::path(
    get,
    path = "/api/upload/signature",
    tag = "upload",
    responses(
        (status = 200, description = "Upload signature", body = ApiResponse<SignatureData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 503, description = "Remote credentials not configured", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "upload_signature"))]
pub async fn upload_signature(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SignatureData>>, HttpAppError> {
    let signature = UploadService::new(&state).signature()?;
    Ok(Json(ApiResponse::data(signature)))
}
