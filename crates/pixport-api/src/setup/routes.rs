//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState};
use crate::constants::{HEALTH_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH, UPLOAD_PREFIX};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use pixport_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut upload_routes = upload_routes();
    if let Some(token) = config.upload_api_token() {
        let auth_state = Arc::new(AuthState {
            api_token: token.to_string(),
        });
        upload_routes =
            upload_routes.layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware));
    }

    let body_limit = max_body_bytes(config);
    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit,
        body_limit,
        auth_enabled = config.upload_api_token().is_some(),
        "HTTP limits configured"
    );

    let app = Router::new()
        .route(HEALTH_PATH, get(handlers::health::liveness_check))
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .nest(UPLOAD_PREFIX, upload_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs").into(),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile-photo",
            post(handlers::profile_photo::upload_profile_photo),
        )
        .route("/images", post(handlers::images::upload_images))
        .route(
            "/image/{*public_id}",
            delete(handlers::image_delete::delete_image),
        )
        .route("/signature", get(handlers::signature::upload_signature))
}

/// Largest accepted request body: every file at the size limit plus multipart framing
fn max_body_bytes(config: &Config) -> usize {
    config
        .max_file_size_bytes()
        .saturating_mul(config.max_images_per_request())
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixport_core::UploadProcessorConfig;

    #[test]
    fn test_body_limit_covers_a_full_batch() {
        let inner = UploadProcessorConfig::local("/tmp/media", "/tmp/spool");
        let config = Config(Box::new(inner));
        assert_eq!(
            max_body_bytes(&config),
            5 * 5 * 1024 * 1024 + MULTIPART_OVERHEAD_BYTES
        );
    }

    #[test]
    fn test_setup_cors_rejects_malformed_origin() {
        let mut inner = UploadProcessorConfig::local("/tmp/media", "/tmp/spool");
        inner.cors_origins = vec!["https://ok.example.com".to_string(), "bad\norigin".to_string()];
        assert!(setup_cors(&Config(Box::new(inner))).is_err());
    }
}
