//! Direct-upload signature integration tests.

mod helpers;

use helpers::{api_path, setup_test_app, setup_test_app_with, test_credentials, TestAppOptions};
use serde_json::Value;
use sha2::{Digest, Sha256};

#[tokio::test]
async fn test_signature_requires_credentials() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/signature")).await;
    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_CONFIGURED");
    assert_eq!(body["message"], "Image host is not configured");
}

#[tokio::test]
async fn test_signature_is_verifiable() {
    let app = setup_test_app_with(TestAppOptions {
        credentials: Some(test_credentials()),
        ..Default::default()
    })
    .await;

    let response = app.client().get(&api_path("/signature")).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body.get("message").is_none());

    let data = &body["data"];
    assert_eq!(data["apiKey"], "123456789012345");
    assert_eq!(data["cloudName"], "demo");
    assert_eq!(data["folder"], "earnbuddy/uploads");
    assert_eq!(data["signatureAlgorithm"], "sha256");

    let timestamp = data["timestamp"].as_i64().unwrap();
    let expected = hex::encode(Sha256::digest(
        format!("folder=earnbuddy/uploads&timestamp={}test-secret", timestamp).as_bytes(),
    ));
    assert_eq!(data["signature"], expected.as_str());
}
