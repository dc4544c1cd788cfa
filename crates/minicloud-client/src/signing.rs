//! Signed URL responses
//!
//! Backends answer `GET /sign/{key}` either with a plain-text URL or with a
//! JSON envelope naming it `url`, `signedUrl` or `signed_url`.
//! [`resolve_signed_url`] accepts all of them and fails only when no URL can
//! be found.

use serde_json::Value;
use tracing::debug;

use crate::client::{ImageClient, ResponseBody};
use crate::ClientError;

/// JSON fields that may carry the signed URL, in lookup order
const URL_FIELDS: &[&str] = &["url", "signedUrl", "signed_url"];

/// Raw answer of the signing endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum SignedUrlResponse {
    Text(String),
    Json(Value),
}

impl SignedUrlResponse {
    /// The signed URL, if the response carries one
    pub fn url(&self) -> Option<&str> {
        match self {
            SignedUrlResponse::Text(text) => Some(text.trim()).filter(|t| !t.is_empty()),
            SignedUrlResponse::Json(Value::String(text)) => {
                Some(text.trim()).filter(|t| !t.is_empty())
            }
            SignedUrlResponse::Json(value) => URL_FIELDS
                .iter()
                .filter_map(|field| value.get(*field).and_then(Value::as_str))
                .map(str::trim)
                .find(|url| !url.is_empty()),
        }
    }
}

impl From<ResponseBody> for SignedUrlResponse {
    fn from(body: ResponseBody) -> Self {
        match body {
            ResponseBody::Json(value) => SignedUrlResponse::Json(value),
            ResponseBody::Text(text) => SignedUrlResponse::Text(text),
        }
    }
}

/// Requests a signed URL for `key` and extracts it from the response
///
/// # Errors
/// Gateway errors are returned unchanged; a response without a URL is
/// [`ClientError::MissingSignedUrl`].
pub async fn resolve_signed_url(
    client: &ImageClient,
    key: &str,
    expires: u64,
) -> Result<String, ClientError> {
    let response = client.get_signed_url(key, expires).await?;
    let url = response.url().ok_or(ClientError::MissingSignedUrl)?;
    debug!(key, expires, "Resolved signed URL");
    Ok(url.to_string())
}
