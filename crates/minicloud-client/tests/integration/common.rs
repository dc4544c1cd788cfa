//! Shared test helpers for backend integration tests
//!
//! Provides wiremock-based mock server setup for the MiniCloud REST
//! surface. Each helper mounts the necessary mock endpoints; the setup
//! function returns an ImageClient pointing at the mock server.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use minicloud_client::client::ImageClient;
use minicloud_core::config::{ConfigProvider, RequestConfig};

/// API key configured on clients created by [`setup_backend_mock`]
pub const TEST_API_KEY: &str = "test-api-key";

/// Starts a mock server and returns a (MockServer, ImageClient) tuple.
///
/// No endpoints are mounted; tests add the ones they exercise.
pub async fn setup_backend_mock() -> (MockServer, ImageClient) {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), TEST_API_KEY);
    (server, client)
}

/// Creates a client with explicit settings.
pub fn client_for(base_url: &str, api_key: &str) -> ImageClient {
    ImageClient::new(ConfigProvider::new(RequestConfig::new(base_url, api_key)))
}

/// Mounts `GET /list` answering with the given JSON body.
pub async fn mount_list_json(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(header("x-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts `POST /upload` answering with the given JSON body.
pub async fn mount_upload(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("x-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(201).set_body_json(body))
        .mount(server)
        .await;
}
