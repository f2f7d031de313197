//! Authentication and CORS integration tests.
//!
//! Exercises the front of the pipeline: CORS headers and preflight, then the
//! `SPITFIRE-API-KEY` check, against a live `TestPostServer`.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use post_service::repositories::PostStore;
use post_test_utils::{CountingPostStore, TestPostServer, TEST_API_KEY};
use std::collections::HashMap;
use std::sync::Arc;

const UNAUTHORIZED_BODY: &str = r#"{"message":"Unauthorized"}"#;

async fn assert_unauthorized(response: reqwest::Response) -> Result<()> {
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, serde_json::from_str::<serde_json::Value>(UNAUTHORIZED_BODY)?);
    Ok(())
}

#[tokio::test]
async fn test_missing_key_is_rejected_without_side_effects() -> Result<()> {
    let store = Arc::new(CountingPostStore::new());
    let server = TestPostServer::spawn_with_store(store.clone()).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/posts", server.url()))
        .json(&serde_json::json!({"title": "Hello"}))
        .send()
        .await?;
    assert_unauthorized(response).await?;

    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.find_all().await?.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_empty_key_is_rejected() -> Result<()> {
    let server = TestPostServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/posts", server.url()))
        .header("SPITFIRE-API-KEY", "")
        .send()
        .await?;
    assert_unauthorized(response).await
}

#[tokio::test]
async fn test_unknown_key_is_rejected_for_every_route() -> Result<()> {
    let store = Arc::new(CountingPostStore::new());
    let server = TestPostServer::spawn_with_store(store.clone()).await?;
    let client = reqwest::Client::new();
    let base = server.url();

    let requests = [
        client.get(format!("{base}/")),
        client.get(format!("{base}/ping")),
        client.get(format!("{base}/posts")),
        client
            .post(format!("{base}/posts"))
            .json(&serde_json::json!({"title": "A"})),
        client
            .put(format!("{base}/posts/some-id"))
            .json(&serde_json::json!({"title": "A"})),
        client.delete(format!("{base}/posts/some-id")),
    ];

    for request in requests {
        let response = request.header("SPITFIRE-API-KEY", "elite").send().await?;
        assert_unauthorized(response).await?;
    }

    assert_eq!(store.mutation_calls(), 0);
    assert_eq!(store.find_all_calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_any_configured_key_is_accepted() -> Result<()> {
    let server = TestPostServer::spawn_with(
        Arc::new(CountingPostStore::new()),
        HashMap::from([("API_KEYS".to_string(), "first,second".to_string())]),
    )
    .await?;
    let client = reqwest::Client::new();

    for key in ["first", "second"] {
        let response = client
            .get(format!("{}/ping", server.url()))
            .header("SPITFIRE-API-KEY", key)
            .send()
            .await?;
        assert_eq!(response.status(), 200);
    }

    let response = client
        .get(format!("{}/ping", server.url()))
        .header("SPITFIRE-API-KEY", TEST_API_KEY)
        .send()
        .await?;
    assert_unauthorized(response).await
}

#[tokio::test]
async fn test_header_name_is_case_insensitive() -> Result<()> {
    let server = TestPostServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/ping", server.url()))
        .header("spitfire-api-key", TEST_API_KEY)
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_preflight_succeeds_without_key() -> Result<()> {
    let server = TestPostServer::spawn().await?;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/posts", server.url()))
        .header("Origin", "https://blog.example")
        .header("Access-Control-Request-Method", "DELETE")
        .header("Access-Control-Request-Headers", "spitfire-api-key")
        .send()
        .await?;

    assert_eq!(response.status(), 204);
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://blog.example")
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
    assert_eq!(
        headers
            .get("access-control-max-age")
            .and_then(|v| v.to_str().ok()),
        Some("43200")
    );
    assert!(headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|m| m.contains("DELETE")));

    Ok(())
}

#[tokio::test]
async fn test_cors_max_age_is_configurable() -> Result<()> {
    let server = TestPostServer::spawn_with(
        Arc::new(CountingPostStore::new()),
        HashMap::from([("CORS_MAX_AGE_SECONDS".to_string(), "60".to_string())]),
    )
    .await?;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/posts", server.url()))
        .header("Origin", "https://blog.example")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await?;

    assert_eq!(
        response
            .headers()
            .get("access-control-max-age")
            .and_then(|v| v.to_str().ok()),
        Some("60")
    );

    Ok(())
}

#[tokio::test]
async fn test_non_ascii_key_fails_at_startup() -> Result<()> {
    let result = TestPostServer::spawn_with(
        Arc::new(CountingPostStore::new()),
        HashMap::from([("API_KEYS".to_string(), "clé".to_string())]),
    )
    .await;

    let Err(err) = result else {
        anyhow::bail!("server should refuse a key that no header can match");
    };
    assert!(err.to_string().contains("visible ASCII"), "{err}");

    Ok(())
}
