//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::{Context, Result};
use pixport_core::Config;

/// Validate critical configuration values and prepare the spool directory
pub async fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.upload_api_token().is_none() {
        tracing::warn!(
            "UPLOAD_API_TOKEN not set - upload routes are reachable without authentication"
        );
    }

    tokio::fs::create_dir_all(config.upload_tmp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload spool directory {}",
                config.upload_tmp_dir().display()
            )
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixport_core::UploadProcessorConfig;

    #[tokio::test]
    async fn test_validate_config_creates_spool_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let spool_dir = tmp.path().join("spool");
        let config = Config(Box::new(UploadProcessorConfig::local(
            tmp.path().join("media").to_string_lossy().to_string(),
            &spool_dir,
        )));

        validate_config(&config).await.unwrap();
        assert!(spool_dir.is_dir());
    }

    #[tokio::test]
    async fn test_validate_config_rejects_wildcard_cors_in_production() {
        let tmp = tempfile::tempdir().unwrap();
        let mut inner = UploadProcessorConfig::local(
            tmp.path().to_string_lossy().to_string(),
            tmp.path().join("spool"),
        );
        inner.environment = "production".to_string();
        inner.cors_origins = vec!["*".to_string()];

        assert!(validate_config(&Config(Box::new(inner))).await.is_err());
    }
}
