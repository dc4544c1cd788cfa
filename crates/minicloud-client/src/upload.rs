//! Image upload flow
//!
//! Provides functions for sending images to the backend:
//! - [`upload_file`] - Reads a local file and uploads it
//! - [`upload_bytes`] - Uploads an in-memory image under a given file name
//!
//! A successful upload is recorded in the [`SessionLog`] right away, so the
//! image shows up in the gallery before the next listing poll confirms it.

use std::path::Path;

use chrono::Utc;
use minicloud_core::domain::{SessionLog, SessionUploadEntry, TransformParams};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ImageClient, ResponseBody};
use crate::ClientError;

/// Multipart field name the backend expects the image under
const FILE_FIELD: &str = "file";

/// Parsed answer of `POST /upload`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// Server-assigned key, when present and non-empty
    pub key: Option<String>,
    /// The full response body
    pub body: Value,
}

impl From<ResponseBody> for UploadReceipt {
    fn from(body: ResponseBody) -> Self {
        let body = body.into_json();
        let key = body
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        Self { key, body }
    }
}

/// Guesses an image MIME type from a file name's extension
pub fn guess_mime(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Uploads a local image file and records it in the session log
///
/// # Arguments
/// * `client` - Gateway to upload through
/// * `log` - Session log receiving the new entry
/// * `path` - File to upload; its file name becomes `original_name`
/// * `thumbnail_width` - Width of the thumbnail URL stored with the entry
pub async fn upload_file(
    client: &ImageClient,
    log: &SessionLog,
    path: &Path,
    thumbnail_width: u32,
) -> Result<SessionUploadEntry, ClientError> {
    ensure_configured(client)?;

    let original_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClientError::Config(format!("Not a file: {}", path.display())))?;

    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), size = bytes.len(), "Read file for upload");

    upload_bytes(client, log, &original_name, bytes, thumbnail_width).await
}

/// Uploads an in-memory image and records it in the session log
///
/// # Errors
/// - [`ClientError::Config`] when the base URL or the API key is missing
/// - [`ClientError::MissingKey`] when the backend accepted the upload
///   without returning a key
/// - any gateway error of the upload call
pub async fn upload_bytes(
    client: &ImageClient,
    log: &SessionLog,
    original_name: &str,
    bytes: Vec<u8>,
    thumbnail_width: u32,
) -> Result<SessionUploadEntry, ClientError> {
    ensure_configured(client)?;

    let size = bytes.len();
    let part = Part::bytes(bytes)
        .file_name(original_name.to_string())
        .mime_str(guess_mime(original_name))?;
    let form = Form::new().part(FILE_FIELD, part);

    let receipt = client.upload(form).await?;
    let key = receipt.key.ok_or(ClientError::MissingKey)?;

    let backend_url = client.build_image_url(&key, &TransformParams::thumbnail(thumbnail_width))?;
    let entry = SessionUploadEntry {
        key,
        backend_url,
        original_name: original_name.to_string(),
        uploaded_at: Utc::now().timestamp_millis(),
    };
    log.record(entry.clone());

    info!(key = %entry.key, name = %entry.original_name, size, "Upload completed");
    Ok(entry)
}

fn ensure_configured(client: &ImageClient) -> Result<(), ClientError> {
    let settings = client.config().snapshot();
    if !settings.has_base_url() {
        return Err(ClientError::Config("Base URL is not set".to_string()));
    }
    if settings.api_key.trim().is_empty() {
        return Err(ClientError::Config("API key is not set".to_string()));
    }
    Ok(())
}
