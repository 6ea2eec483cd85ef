mod common;

use common::*;

use mockito::Matcher;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use storage_api_client::{ClientError, StorageApi};

#[tokio::test]
async fn test_generate_signed_url_returns_only_the_url() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .server
        .mock("POST", "/api/signed-url/photos")
        .match_header("content-type", "application/json")
        .match_body(r#"{"blob_name":"x.png","expiration_minutes":15}"#)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"signed_url": "https://example.com/x.png?sig=1", "other": 1}).to_string())
        .create_async()
        .await;

    let url = ctx
        .client
        .generate_signed_url("photos", "x.png", Some(15))
        .await
        .unwrap();

    assert_eq!(url, "https://example.com/x.png?sig=1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_signed_url_default_expiration() {
    let mut ctx = TestContext::new().await;
    let mock = ctx
        .server
        .mock("POST", "/api/signed-url/photos")
        .match_body(Matcher::Json(json!({
            "blob_name": "cats/tom.png",
            "expiration_minutes": 60
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"signed_url": "https://example.com/tom"}).to_string())
        .create_async()
        .await;

    let url = ctx
        .client
        .generate_signed_url("photos", "cats/tom.png", None)
        .await
        .unwrap();

    assert_eq!(url, "https://example.com/tom");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_signed_url_missing_field() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .mock_json(
            "POST",
            "/api/signed-url/photos",
            200,
            json!({"url": "https://example.com/x"}),
        )
        .await;

    let err = ctx
        .client
        .generate_signed_url("photos", "x.png", None)
        .await
        .unwrap_err();

    match err {
        ClientError::MalformedResponse(msg) => assert!(msg.contains("signed_url"), "{msg}"),
        other => panic!("Expected malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_signed_url_non_string_field() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .mock_json(
            "POST",
            "/api/signed-url/photos",
            200,
            json!({"signed_url": null}),
        )
        .await;

    let err = ctx
        .client
        .generate_signed_url("photos", "x.png", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_generate_signed_url_server_error() {
    let mut ctx = TestContext::new().await;
    let _mock = ctx
        .mock_json(
            "POST",
            "/api/signed-url/photos",
            500,
            json!({"detail": "Failed to generate signed URL: no signing key"}),
        )
        .await;

    let err = ctx
        .client
        .generate_signed_url("photos", "x.png", None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        err.to_string(),
        "Unexpected status 500 Internal Server Error: Failed to generate signed URL: no signing key"
    );
}
