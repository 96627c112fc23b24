use anyhow::{ensure, Result};
use serde_json::json;

mod common;
use common::TestServer;

#[tokio::test]
async fn health_endpoint_works() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to read body");
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn full_health_check_pings_storage() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health?mode=full"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn root_endpoint_works() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("/valentines/recipient/{id}"));
}

#[tokio::test]
async fn valentine_crud_over_http() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    // Nothing stored yet
    let response = server
        .client
        .get(server.url("/valentines/1"))
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    let response = server
        .client
        .post(server.url("/valentines"))
        .json(&json!({
            "text": "hi",
            "track_link": "https://example.com/song",
            "recipient_id": 42,
            "sender": null
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let created: serde_json::Value = response.json().await?;
    let id = created["id"]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("No ID in response"))?;
    ensure!(created["text"] == "hi");
    ensure!(created["recipient_id"] == 42);

    let response = server
        .client
        .get(server.url(&format!("/valentines/{id}")))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let fetched: serde_json::Value = response.json().await?;
    ensure!(fetched == created);

    let response = server
        .client
        .get(server.url("/valentines/recipient/42"))
        .send()
        .await?;
    let listed: serde_json::Value = response.json().await?;
    ensure!(listed == json!([created]));

    Ok(())
}

#[tokio::test]
async fn not_found_bodies_carry_detail() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/credentials/999"))
        .send()
        .await?;
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, json!({ "detail": "Credential not found" }));

    let response = server
        .client
        .post(server.url("/valentines"))
        .json(&json!({
            "text": "hi",
            "track_link": "https://example.com/song",
            "recipient_id": 999
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, json!({ "detail": "Recipient not found" }));

    Ok(())
}

#[tokio::test]
async fn invalid_routes_return_404() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/nonexistent"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn server_handles_concurrent_requests() {
    // ---
    let server = TestServer::new().await;

    // Make multiple concurrent requests
    let futures = (0..10).map(|_| server.client.get(server.url("/credentials/42")).send());

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for response in responses {
        let response = response.expect("Request should succeed");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn server_handles_malformed_json() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/valentines"))
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await
        .expect("Failed to send request");

    // Should return 400 Bad Request
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/credentials/abc"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
