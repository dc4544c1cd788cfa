//! Integration tests for the upload flow
//!
//! Verifies the multipart request, the session log update, and the
//! "no key returned" failure.

use std::io::Write;

use minicloud_client::upload::{upload_bytes, upload_file};
use minicloud_client::ClientError;
use minicloud_core::domain::SessionLog;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_upload_file_records_session_entry() {
    let (server, client) = common::setup_backend_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"holiday.png\""))
        .and(body_string_contains("image/png"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"key": "k-123", "size": 4})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("holiday.png");
    let mut file = std::fs::File::create(&file_path).unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
    drop(file);

    let log = SessionLog::new();
    let entry = upload_file(&client, &log, &file_path, 400)
        .await
        .expect("upload failed");

    assert_eq!(entry.key, "k-123");
    assert_eq!(entry.original_name, "holiday.png");
    assert_eq!(entry.backend_url, format!("{}/image/k-123?w=400", server.uri()));
    assert!(entry.uploaded_at > 0);
    assert_eq!(log.entries(), vec![entry]);
}

#[tokio::test]
async fn test_newest_upload_is_first_in_log() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_upload(&server, serde_json::json!({"key": "same-key"})).await;

    let log = SessionLog::new();
    upload_bytes(&client, &log, "first.jpg", vec![1], 400).await.unwrap();
    upload_bytes(&client, &log, "second.jpg", vec![2], 400).await.unwrap();

    let names: Vec<_> = log.entries().into_iter().map(|e| e.original_name).collect();
    assert_eq!(names, vec!["second.jpg", "first.jpg"]);
}

#[tokio::test]
async fn test_upload_without_key_fails_and_logs_nothing() {
    let (server, client) = common::setup_backend_mock().await;
    common::mount_upload(&server, serde_json::json!({"status": "stored"})).await;

    let log = SessionLog::new();
    let err = upload_bytes(&client, &log, "a.jpg", vec![1, 2], 400)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::MissingKey));
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_upload_http_error_is_surfaced() {
    let (server, client) = common::setup_backend_mock().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let log = SessionLog::new();
    let err = upload_bytes(&client, &log, "big.jpg", vec![0; 16], 400)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "POST /upload failed with status 413: too large");
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let (_server, client) = common::setup_backend_mock().await;
    let log = SessionLog::new();

    let err = upload_file(&client, &log, std::path::Path::new("/nonexistent/x.png"), 400)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}
