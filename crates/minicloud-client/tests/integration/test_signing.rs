//! Integration tests for signed URL requests

use minicloud_client::client::DEFAULT_SIGNED_URL_EXPIRY_SECS;
use minicloud_client::signing::{resolve_signed_url, SignedUrlResponse};
use minicloud_client::ClientError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_signed_url_from_json_envelope() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/sign/cat.jpg"))
        .and(query_param("expires", "3600"))
        .and(header("x-api-key", common::TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signedUrl": "http://cdn.example.com/cat.jpg?sig=abc",
            "expiresIn": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = resolve_signed_url(&client, "cat.jpg", DEFAULT_SIGNED_URL_EXPIRY_SECS)
        .await
        .expect("signing failed");
    assert_eq!(url, "http://cdn.example.com/cat.jpg?sig=abc");
}

#[tokio::test]
async fn test_signed_url_from_plain_text() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/sign/dog.png"))
        .and(query_param("expires", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_string("http://cdn/dog.png?sig=1"))
        .mount(&server)
        .await;

    let response = client.get_signed_url("dog.png", 60).await.unwrap();
    assert_eq!(
        response,
        SignedUrlResponse::Text("http://cdn/dog.png?sig=1".into())
    );
    assert_eq!(response.url(), Some("http://cdn/dog.png?sig=1"));
}

#[tokio::test]
async fn test_signed_url_missing_from_response() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/sign/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let err = resolve_signed_url(&client, "cat.jpg", 3600).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingSignedUrl));
}

#[tokio::test]
async fn test_signed_url_http_error_is_propagated() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/sign/cat.jpg"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = resolve_signed_url(&client, "cat.jpg", 3600).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}
