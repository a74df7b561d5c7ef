//! Integration tests for `GET /api/health`.

use customer_registry_integration_tests::base_url;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running registry server"]
async fn test_health_reports_database() {
    let resp = Client::new()
        .get(format!("{}/api/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).expect("Cache-Control header"),
        "no-cache, no-store, must-revalidate"
    );

    let body: Value = resp.json().await.expect("Health body is JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"], "connected");
    assert_eq!(body["services"]["application"], "running");
}
