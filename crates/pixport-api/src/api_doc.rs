//! OpenAPI documentation, served at `/api/openapi.json` and rendered under `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pixport_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixport API",
        version = "0.1.0",
        description = "Image upload relay. Receives profile photos and post images, normalizes them, and persists them on the image host. Also deletes uploaded images and issues signed parameters for direct client uploads."
    ),
    paths(
        handlers::profile_photo::upload_profile_photo,
        handlers::images::upload_images,
        handlers::image_delete::delete_image,
        handlers::signature::upload_signature,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::ProfilePhotoData,
            models::ImagesData,
            models::UploadedImage,
            models::DeleteImageData,
            models::SignatureData,
            error::ErrorResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "upload", description = "Image upload, deletion and direct-upload signing"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_upload_routes() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| *p == "/api/upload/profile-photo"));
        assert!(paths.iter().any(|p| *p == "/api/upload/images"));
        assert!(paths.iter().any(|p| *p == "/api/upload/image/{public_id}"));
        assert!(paths.iter().any(|p| *p == "/api/upload/signature"));
        assert!(paths.iter().any(|p| *p == "/health"));
    }

    #[test]
    fn test_signature_route_documents_algorithm() {
        let spec = ApiDoc::openapi();
        let operation = spec.paths.paths["/api/upload/signature"]
            .get
            .as_ref()
            .unwrap();
        let description = operation.description.as_deref().unwrap_or_default();
        assert!(description.contains("SHA-256"));
        assert!(description.contains("signature_algorithm=sha256"));
    }
}
