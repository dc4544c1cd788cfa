//! Integration tests for the request gateway
//!
//! Covers authentication, query serialization, content-type branching and
//! the error taxonomy (config, HTTP, network, invalid response).

use minicloud_client::client::{RequestOptions, ResponseBody};
use minicloud_client::ClientError;
use reqwest::Method;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, Request, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_get_metadata_returns_json() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/metadata/cat.jpg"))
        .and(header("x-api-key", common::TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "key": "cat.jpg",
            "width": 1024,
            "height": 768,
            "format": "jpeg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client.get_metadata("cat.jpg").await.expect("metadata failed");
    assert_eq!(metadata["width"], 1024);
    assert_eq!(metadata["format"], "jpeg");
}

#[tokio::test]
async fn test_key_is_percent_encoded_in_path() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/metadata/summer%20trip.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client
        .get_metadata("summer trip.jpg")
        .await
        .expect("metadata failed");
    assert_eq!(metadata["ok"], true);
}

#[tokio::test]
async fn test_missing_api_key_is_sent_empty() {
    let server = wiremock::MockServer::start().await;
    let client = common::client_for(&server.uri(), "");

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(|req: &Request| {
            req.headers
                .get("x-api-key")
                .map(|v| v.as_bytes().is_empty())
                .unwrap_or(false)
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list().await.expect("list failed");
}

#[tokio::test]
async fn test_plain_text_body_is_returned_raw() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let body = client
        .request(Method::GET, &["ping"], RequestOptions::default())
        .await
        .expect("request failed");
    assert_eq!(body, ResponseBody::Text("pong".into()));
}

#[tokio::test]
async fn test_query_skips_absent_values() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "cats"))
        .and(|req: &Request| req.url.query() == Some("q=cats&page=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"hits": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::default()
        .query("q", Some("cats"))
        .query("limit", None::<u32>)
        .query("page", Some(2));
    let body = client
        .request(Method::GET, &["search"], options)
        .await
        .expect("request failed");
    assert_eq!(body.into_json()["hits"], 1);
}

#[tokio::test]
async fn test_http_error_carries_method_path_status_and_body() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/metadata/missing.jpg"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such key"))
        .mount(&server)
        .await;

    let err = client.get_metadata("missing.jpg").await.unwrap_err();
    match &err {
        ClientError::Http {
            method,
            path,
            status,
            body,
        } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/metadata/missing.jpg");
            assert_eq!(*status, 404);
            assert_eq!(body.as_deref(), Some("no such key"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "GET /metadata/missing.jpg failed with status 404: no such key"
    );
}

#[tokio::test]
async fn test_http_error_without_body() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "GET /list failed with status 401");
}

#[tokio::test]
async fn test_missing_base_url_fails_before_network() {
    let client = common::client_for("", common::TEST_API_KEY);

    let err = client.get_metadata("cat.jpg").await.unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Base URL is not set"));
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    // Nothing listens on port 1
    let client = common::client_for("http://127.0.0.1:1", common::TEST_API_KEY);

    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("GET"))
        .and(path("/metadata/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let err = client.get_metadata("broken").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)), "got {err:?}");
}
