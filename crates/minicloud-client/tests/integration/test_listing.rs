//! Integration tests for `GET /list` and its response shapes

use minicloud_core::domain::ListResponse;
use minicloud_core::ports::IImageBackend;
use minicloud_client::provider::HttpImageBackend;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

fn keys(listing: ListResponse) -> Vec<String> {
    listing.into_entries().into_iter().map(|e| e.key).collect()
}

#[tokio::test]
async fn test_list_items_shape() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(
        &server,
        serde_json::json!({
            "items": [
                {"key": "a.jpg", "size": 100, "lastModified": "2026-01-15T10:00:00Z"},
                {"key": "b.jpg", "size": 200}
            ]
        }),
    )
    .await;

    let listing = client.list().await.expect("list failed");
    assert_eq!(listing.shape(), "items");

    let entries = listing.into_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key, "a.jpg");
    assert_eq!(entries[0].size, Some(100));
    assert_eq!(entries[1].last_modified, None);
}

#[tokio::test]
async fn test_list_keys_shape() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(&server, serde_json::json!({"keys": ["x.png", "y.png"]})).await;

    let listing = client.list().await.expect("list failed");
    assert_eq!(keys(listing), vec!["x.png", "y.png"]);
}

#[tokio::test]
async fn test_list_bare_arrays() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(&server, serde_json::json!(["one.jpg", "two.jpg"])).await;
    assert_eq!(keys(client.list().await.unwrap()), vec!["one.jpg", "two.jpg"]);

    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(&server, serde_json::json!([{"key": "e.jpg", "size": 1}])).await;
    assert_eq!(keys(client.list().await.unwrap()), vec!["e.jpg"]);
}

#[tokio::test]
async fn test_list_unrecognized_json_is_empty() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(&server, serde_json::json!({"files": 3})).await;

    let listing = client.list().await.expect("list failed");
    assert_eq!(listing, ListResponse::Unrecognized);
    assert!(listing.into_entries().is_empty());
}

#[tokio::test]
async fn test_list_plain_text_is_empty() {
    let (server, client) = common::setup_backend_mock().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a.jpg\nb.jpg"))
        .mount(&server)
        .await;

    assert_eq!(client.list().await.unwrap(), ListResponse::Unrecognized);
}

#[tokio::test]
async fn test_backend_adapter_delegates_to_client() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_list_json(&server, serde_json::json!({"keys": ["k1"]})).await;

    let backend = HttpImageBackend::new(client);
    let listing = backend.list().await.expect("adapter list failed");
    assert_eq!(keys(listing), vec!["k1"]);
}

#[tokio::test]
async fn test_backend_adapter_wraps_errors() {
    let (server, client) = common::setup_backend_mock().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let backend = HttpImageBackend::new(client);
    let err = backend.list().await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("GET /list failed with status 503: maintenance"));
}
