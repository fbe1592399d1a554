//! API constants

/// Prefix of every upload route
pub const UPLOAD_PREFIX: &str = "/api/upload";

/// Liveness probe path (never authenticated)
pub const HEALTH_PATH: &str = "/health";

/// Served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Extra body allowance on top of the file payload for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Folder suffix for direct client uploads signed by `/signature`
pub const DIRECT_UPLOAD_FOLDER: &str = "uploads";
